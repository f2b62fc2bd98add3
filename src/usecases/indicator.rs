//! Indicator - Placeholder Pass and Reconnecting Stream Loop
//!
//! The single sequential loop of the process:
//! 1. Push "N/A" placeholders for every tracked pair
//! 2. Connect (retrying forever) and subscribe
//! 3. Route every decoded tick to the display
//! 4. On connection loss, wait one backoff interval, rebuild the
//!    session and go back to 2
//!
//! A failed subscription send is treated like a lost connection: the
//! session is discarded and rebuilt. Only the shutdown signal ends
//! the loop.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::broadcast;
use tracing::{info, instrument, warn};

use crate::adapters::feeds::FeedSession;
use crate::domain::TrackedPair;
use crate::ports::backoff::Backoff;
use crate::ports::display_sink::DisplaySink;
use crate::ports::feed_transport::{FeedConnector, FeedError};

use super::stats::FeedStats;
use super::tick_router::TickRouter;

/// Feed endpoint and subscription channels.
#[derive(Debug, Clone)]
pub struct IndicatorSettings {
  /// WebSocket endpoint.
  pub ws_url: String,
  /// Channels named in the subscription.
  pub channels: Vec<String>,
}

/// How a streaming session ended.
enum SessionEnd {
  Shutdown,
  Lost(FeedError),
}

/// Drives feed sessions and routes their ticks to the display.
pub struct Indicator<C, B, S>
where
  C: FeedConnector,
  B: Backoff,
  S: DisplaySink + ?Sized,
{
  /// Opens feed transports.
  connector: C,
  /// Delay between connection attempts.
  backoff: B,
  /// Tick to display routing.
  router: TickRouter<S>,
  /// Tracked pairs, in configuration order.
  pairs: Vec<TrackedPair>,
  /// Feed endpoint settings.
  settings: IndicatorSettings,
  /// Counters shared with the health server.
  stats: Arc<FeedStats>,
}

impl<C, B, S> Indicator<C, B, S>
where
  C: FeedConnector,
  B: Backoff,
  S: DisplaySink + ?Sized,
{
  pub fn new(
    connector: C,
    backoff: B,
    router: TickRouter<S>,
    pairs: Vec<TrackedPair>,
    settings: IndicatorSettings,
  ) -> Self {
    Self {
      connector,
      backoff,
      router,
      pairs,
      settings,
      stats: Arc::new(FeedStats::new()),
    }
  }

  /// Shared counters for health and metrics endpoints.
  pub fn stats(&self) -> Arc<FeedStats> {
    Arc::clone(&self.stats)
  }

  /// Run until the shutdown signal fires.
  #[instrument(skip_all, name = "indicator_loop")]
  pub async fn run(&self, mut shutdown_rx: broadcast::Receiver<()>) -> Result<()> {
    info!(
      pairs = self.pairs.len(),
      url = %self.settings.ws_url,
      "Starting indicator"
    );

    self.router.initialize(&self.pairs).await;

    loop {
      let session = FeedSession::connect(
        &self.connector,
        &self.settings.ws_url,
        &self.backoff,
        &mut shutdown_rx,
      )
      .await;

      let mut session = match session {
        Ok(session) => session,
        Err(FeedError::Cancelled) => {
          info!("Shutdown received while connecting");
          return Ok(());
        }
        Err(e) => return Err(e.into()),
      };

      if let Err(e) = session.subscribe(&self.pairs, &self.settings.channels).await {
        warn!(error = %e, "Subscription failed, rebuilding feed session");
        self.stats.record_reconnect();
        if self.pause(&mut shutdown_rx).await {
          return Ok(());
        }
        continue;
      }

      self.stats.set_streaming(true);
      let end = self.stream(&mut session, &mut shutdown_rx).await;
      self.stats.set_streaming(false);

      match end {
        SessionEnd::Shutdown => {
          info!("Indicator stopped cleanly");
          return Ok(());
        }
        SessionEnd::Lost(e) => {
          warn!(error = %e, "Feed session lost, reconnecting");
          self.stats.record_reconnect();
          if self.pause(&mut shutdown_rx).await {
            return Ok(());
          }
        }
      }
    }
  }

  /// Route ticks from one session until it dies or shutdown fires.
  async fn stream(
    &self,
    session: &mut FeedSession<C::Transport>,
    shutdown_rx: &mut broadcast::Receiver<()>,
  ) -> SessionEnd {
    loop {
      tokio::select! {
        biased;
        _ = shutdown_rx.recv() => return SessionEnd::Shutdown,
        next = session.next_tick() => {
          match next {
            Ok(Some(tick)) => {
              let outcome = self.router.route(&tick).await;
              self.stats.record_route(outcome);
            }
            Ok(None) => self.stats.record_decode_failure(),
            Err(e) => return SessionEnd::Lost(e),
          }
        }
      }
    }
  }

  /// Wait one backoff interval. Returns `true` if shutdown fired.
  async fn pause(&self, shutdown_rx: &mut broadcast::Receiver<()>) -> bool {
    tokio::select! {
      biased;
      _ = shutdown_rx.recv() => true,
      () = self.backoff.wait(1) => false,
    }
  }
}
