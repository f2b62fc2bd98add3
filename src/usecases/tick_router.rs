//! Tick Router - Ticks to Display Updates
//!
//! Turns decoded ticks (and the initial configuration) into
//! `DisplayUpdate`s and forwards them to the display sink. Display
//! failures are logged and absorbed: one failed push never interrupts
//! the feed, and the next tick for that pair retries implicitly.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::domain::update::format_label;
use crate::domain::{DisplayUpdate, SymbolTable, Tick, TrackedPair};
use crate::ports::display_sink::DisplaySink;

/// What happened to a routed tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
  /// Update delivered to the display.
  Pushed,
  /// Not a price update (empty identifier).
  Discarded,
  /// Identifier could not be split into base/quote.
  Malformed,
  /// Display push failed.
  Failed,
}

/// Static per-process router settings.
#[derive(Debug, Clone)]
pub struct RouterSettings {
  /// Feed name used in identifiers.
  pub feed_name: String,
  /// Icon path attached to every update.
  pub icon: Option<String>,
  /// Label-format guide attached to every update.
  pub format_guide: Option<String>,
}

/// Routes ticks to a display sink.
pub struct TickRouter<S: DisplaySink + ?Sized> {
  /// Display collaborator.
  sink: Arc<S>,
  /// Currency glyph lookup.
  symbols: SymbolTable,
  /// Identifier and decoration settings.
  settings: RouterSettings,
}

impl<S: DisplaySink + ?Sized> TickRouter<S> {
  pub fn new(sink: Arc<S>, symbols: SymbolTable, settings: RouterSettings) -> Self {
    Self {
      sink,
      symbols,
      settings,
    }
  }

  /// Update for `pair` with the given price, or "N/A" when unknown.
  pub fn build_update(&self, pair: &TrackedPair, price: Option<f64>) -> DisplayUpdate {
    DisplayUpdate::new(
      pair.indicator_id(&self.settings.feed_name),
      format_label(&self.symbols, pair, price),
    )
    .with_icon(self.settings.icon.clone())
    .with_format_guide(self.settings.format_guide.clone())
  }

  /// Push an "N/A" placeholder for every pair.
  ///
  /// Returns how many placeholders were delivered. Failures are
  /// logged; they never block streaming.
  #[instrument(skip(self, pairs), fields(pairs = pairs.len()))]
  pub async fn initialize(&self, pairs: &[TrackedPair]) -> usize {
    let mut delivered = 0;

    for pair in pairs {
      let update = self.build_update(pair, None);
      match self.sink.push(&update).await {
        Ok(()) => delivered += 1,
        Err(e) => {
          warn!(error = %e, id = %update.id, "Failed to push placeholder");
        }
      }
    }

    info!(delivered, total = pairs.len(), "Display placeholders pushed");
    delivered
  }

  /// Route one tick to the display.
  pub async fn route(&self, tick: &Tick) -> RouteOutcome {
    if !tick.is_price_update() {
      return RouteOutcome::Discarded;
    }

    debug!(
      price = tick.price,
      product = %tick.product_id,
      last_size = tick.last_size,
      "Got tick"
    );

    let Some(pair) = TrackedPair::from_product_id(&tick.product_id) else {
      debug!(product = %tick.product_id, "Unroutable product identifier");
      return RouteOutcome::Malformed;
    };

    let update = self.build_update(&pair, Some(tick.price));
    match self.sink.push(&update).await {
      Ok(()) => RouteOutcome::Pushed,
      Err(e) => {
        warn!(error = %e, id = %update.id, "Failed to push display update");
        RouteOutcome::Failed
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use async_trait::async_trait;

  use super::*;
  use crate::ports::display_sink::SinkError;

  /// Sink recording every update; fails ids listed in `failing`.
  #[derive(Default)]
  struct RecordingSink {
    updates: Mutex<Vec<DisplayUpdate>>,
    failing: Vec<String>,
  }

  #[async_trait]
  impl DisplaySink for RecordingSink {
    async fn push(&self, update: &DisplayUpdate) -> Result<(), SinkError> {
      self.updates.lock().unwrap().push(update.clone());
      if self.failing.contains(&update.id) {
        return Err(SinkError::Rejected("busy".into()));
      }
      Ok(())
    }
  }

  fn settings() -> RouterSettings {
    RouterSettings {
      feed_name: "gdax".to_string(),
      icon: None,
      format_guide: None,
    }
  }

  fn router(sink: &Arc<RecordingSink>) -> TickRouter<RecordingSink> {
    TickRouter::new(Arc::clone(sink), SymbolTable::default(), settings())
  }

  #[tokio::test]
  async fn test_route_builds_identifier_and_label() {
    let sink = Arc::new(RecordingSink::default());
    let outcome = router(&sink)
      .route(&Tick::new("BTC-EUR", 20123.40, 0.01))
      .await;

    assert_eq!(outcome, RouteOutcome::Pushed);
    let updates = sink.updates.lock().unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].id, "indicator-gdax-BTC-EUR");
    assert_eq!(updates[0].label, "₿/€: 20123");
  }

  #[tokio::test]
  async fn test_empty_tick_is_discarded() {
    let sink = Arc::new(RecordingSink::default());
    assert_eq!(router(&sink).route(&Tick::empty()).await, RouteOutcome::Discarded);
    assert!(sink.updates.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_malformed_identifier() {
    let sink = Arc::new(RecordingSink::default());
    let outcome = router(&sink).route(&Tick::new("BTCEUR", 1.0, 0.0)).await;
    assert_eq!(outcome, RouteOutcome::Malformed);
    assert!(sink.updates.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_initialize_continues_past_failures() {
    let sink = Arc::new(RecordingSink {
      failing: vec!["indicator-gdax-BTC-EUR".to_string()],
      ..Default::default()
    });
    let pairs = vec![TrackedPair::new("BTC", "EUR"), TrackedPair::new("ETH", "EUR")];

    let delivered = router(&sink).initialize(&pairs).await;

    assert_eq!(delivered, 1);
    let updates = sink.updates.lock().unwrap();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].label, "₿/€: N/A");
    assert_eq!(updates[1].label, "Ξ/€: N/A");
    assert_eq!(updates[1].id, "indicator-gdax-ETH-EUR");
  }

  #[tokio::test]
  async fn test_failed_push_reported_not_fatal() {
    let sink = Arc::new(RecordingSink {
      failing: vec!["indicator-gdax-BTC-EUR".to_string()],
      ..Default::default()
    });
    let router = router(&sink);

    assert_eq!(router.route(&Tick::new("BTC-EUR", 1.0, 0.0)).await, RouteOutcome::Failed);
    assert_eq!(router.route(&Tick::new("ETH-EUR", 2.0, 0.0)).await, RouteOutcome::Pushed);
  }

  #[test]
  fn test_decorations_attached() {
    let sink = Arc::new(RecordingSink::default());
    let router = TickRouter::new(
      sink,
      SymbolTable::default(),
      RouterSettings {
        feed_name: "gdax".to_string(),
        icon: Some("/icons/btc.png".to_string()),
        format_guide: Some("AAA/BBB: 123456789".to_string()),
      },
    );

    let update = router.build_update(&TrackedPair::new("BTC", "EUR"), Some(999.4));
    assert_eq!(update.label, "₿/€: 999");
    assert_eq!(update.icon.as_deref(), Some("/icons/btc.png"));
    assert_eq!(update.format_guide.as_deref(), Some("AAA/BBB: 123456789"));
    assert!(update.active);
  }
}
