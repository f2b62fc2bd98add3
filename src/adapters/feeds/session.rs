//! Feed Session - Reconnecting Handle to the Streaming Feed
//!
//! Lifecycle: `Disconnected -> Connecting -> Connected -> Streaming`.
//! `connect` retries until a transport opens (or shutdown fires),
//! `subscribe` sends the one subscription message, and `next_tick`
//! yields decoded ticks until the connection dies. A dead session is
//! not restartable; build a fresh one with `connect` + `subscribe`.

use futures_util::stream::{self, Stream};
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

use super::gdax::{self, DecodeError};
use crate::domain::{Tick, TrackedPair};
use crate::ports::backoff::Backoff;
use crate::ports::feed_transport::{FeedConnector, FeedError, FeedTransport};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    /// Transport open, subscription not yet sent.
    Connected,
    Streaming,
    /// Transport failed; the session must be rebuilt.
    Closed,
}

/// An open feed connection and its subscription state.
pub struct FeedSession<T: FeedTransport> {
    transport: T,
    state: SessionState,
    /// Connection attempts it took to open this session.
    attempts: u32,
}

impl<T: FeedTransport> FeedSession<T> {
    /// Connect to `url`, retrying after every failure until it succeeds.
    ///
    /// There is no retry limit. The only way out other than success is
    /// the shutdown signal, which yields `FeedError::Cancelled`.
    #[instrument(skip(connector, backoff, shutdown_rx))]
    pub async fn connect<C, B>(
        connector: &C,
        url: &str,
        backoff: &B,
        shutdown_rx: &mut broadcast::Receiver<()>,
    ) -> Result<Self, FeedError>
    where
        C: FeedConnector<Transport = T>,
        B: Backoff + ?Sized,
    {
        let mut state = SessionState::Disconnected;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            state = transition(state, SessionState::Connecting);

            let result = tokio::select! {
                biased;
                _ = shutdown_rx.recv() => return Err(FeedError::Cancelled),
                result = connector.connect(url) => result,
            };

            match result {
                Ok(transport) => {
                    info!(attempts = attempt, "Feed session connected");
                    return Ok(Self {
                        transport,
                        state: transition(state, SessionState::Connected),
                        attempts: attempt,
                    });
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        attempt,
                        retry_in_ms = backoff.delay(attempt).as_millis(),
                        "Feed connection failed, retrying"
                    );
                    tokio::select! {
                        biased;
                        _ = shutdown_rx.recv() => return Err(FeedError::Cancelled),
                        () = backoff.wait(attempt) => {}
                    }
                }
            }
        }
    }

    /// Send one subscription naming every pair on the given channels.
    pub async fn subscribe(
        &mut self,
        pairs: &[TrackedPair],
        channels: &[String],
    ) -> Result<(), FeedError> {
        if self.state == SessionState::Closed {
            return Err(FeedError::Closed);
        }

        let message = gdax::encode_subscription(pairs, channels)?;

        if let Err(e) = self.transport.send_text(message).await {
            self.state = transition(self.state, SessionState::Closed);
            return Err(e);
        }

        self.state = transition(self.state, SessionState::Streaming);
        info!(pairs = pairs.len(), channels = ?channels, "Feed subscription sent");
        Ok(())
    }

    /// Wait for the next inbound message and decode it.
    ///
    /// `Ok(None)` means the message could not be decoded and was
    /// skipped; call again. `Err` means the connection is gone.
    /// Empty-identifier ticks are returned as-is for the caller to
    /// discard.
    pub async fn next_tick(&mut self) -> Result<Option<Tick>, FeedError> {
        let text = match self.transport.recv_text().await {
            Ok(text) => text,
            Err(e) => {
                self.state = transition(self.state, SessionState::Closed);
                return Err(e);
            }
        };

        match gdax::decode_tick(&text) {
            Ok(tick) => Ok(Some(tick)),
            Err(DecodeError::FeedReported(reason)) => {
                warn!(reason = %reason, "Feed reported an error");
                Ok(None)
            }
            Err(e) => {
                debug!(error = %e, "Failed to decode feed message");
                Ok(None)
            }
        }
    }

    /// Consume the session as a lazy tick sequence.
    ///
    /// Decode failures are skipped. The sequence yields at most one
    /// `Err` (the connection failure) and then ends.
    pub fn into_ticks(self) -> impl Stream<Item = Result<Tick, FeedError>> {
        stream::unfold(Some(self), |session| async move {
            let mut session = session?;
            loop {
                match session.next_tick().await {
                    Ok(Some(tick)) => return Some((Ok(tick), Some(session))),
                    Ok(None) => {}
                    Err(e) => return Some((Err(e), None)),
                }
            }
        })
    }

    pub const fn state(&self) -> SessionState {
        self.state
    }

    pub const fn attempts(&self) -> u32 {
        self.attempts
    }
}

fn transition(from: SessionState, to: SessionState) -> SessionState {
    if from != to {
        debug!(from = ?from, to = ?to, "Feed session state change");
    }
    to
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use futures_util::StreamExt;

    use super::*;

    /// Transport replaying scripted frames, then reporting `Closed`.
    struct ScriptedTransport {
        inbound: VecDeque<String>,
        sent: Arc<Mutex<Vec<String>>>,
        fail_send: bool,
    }

    #[async_trait]
    impl FeedTransport for ScriptedTransport {
        async fn send_text(&mut self, text: String) -> Result<(), FeedError> {
            if self.fail_send {
                return Err(FeedError::Send("broken pipe".into()));
            }
            self.sent.lock().unwrap().push(text);
            Ok(())
        }

        async fn recv_text(&mut self) -> Result<String, FeedError> {
            self.inbound.pop_front().ok_or(FeedError::Closed)
        }
    }

    /// Connector failing a fixed number of times before succeeding.
    struct FlakyConnector {
        failures: u32,
        attempts: AtomicU32,
        inbound: Vec<String>,
        sent: Arc<Mutex<Vec<String>>>,
    }

    impl FlakyConnector {
        fn new(failures: u32, inbound: &[&str]) -> Self {
            Self {
                failures,
                attempts: AtomicU32::new(0),
                inbound: inbound.iter().map(|s| (*s).to_string()).collect(),
                sent: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl FeedConnector for FlakyConnector {
        type Transport = ScriptedTransport;

        async fn connect(&self, _url: &str) -> Result<ScriptedTransport, FeedError> {
            let n = self.attempts.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                return Err(FeedError::Connect("connection refused".into()));
            }
            Ok(ScriptedTransport {
                inbound: self.inbound.iter().cloned().collect(),
                sent: Arc::clone(&self.sent),
                fail_send: false,
            })
        }
    }

    #[derive(Default)]
    struct CountingBackoff {
        waits: AtomicU32,
    }

    #[async_trait]
    impl Backoff for CountingBackoff {
        async fn wait(&self, _attempt: u32) {
            self.waits.fetch_add(1, Ordering::SeqCst);
        }

        fn delay(&self, _attempt: u32) -> Duration {
            Duration::ZERO
        }
    }

    fn ticker(product: &str, price: &str) -> String {
        format!(r#"{{"type":"ticker","product_id":"{product}","price":"{price}","last_size":"0.1"}}"#)
    }

    #[tokio::test]
    async fn test_connect_retries_until_success() {
        let (_tx, mut rx) = broadcast::channel(1);
        let connector = FlakyConnector::new(7, &[]);
        let backoff = CountingBackoff::default();

        let session = FeedSession::connect(&connector, "wss://feed", &backoff, &mut rx)
            .await
            .unwrap();

        assert_eq!(connector.attempts.load(Ordering::SeqCst), 8);
        assert_eq!(backoff.waits.load(Ordering::SeqCst), 7);
        assert_eq!(session.attempts(), 8);
        assert_eq!(session.state(), SessionState::Connected);
    }

    #[tokio::test]
    async fn test_connect_cancelled_by_shutdown() {
        let (tx, mut rx) = broadcast::channel(1);
        let connector = FlakyConnector::new(u32::MAX, &[]);
        let backoff = CountingBackoff::default();
        tx.send(()).unwrap();

        let result = FeedSession::connect(&connector, "wss://feed", &backoff, &mut rx).await;
        assert!(matches!(result, Err(FeedError::Cancelled)));
    }

    #[tokio::test]
    async fn test_subscribe_then_stream() {
        let (_tx, mut rx) = broadcast::channel(1);
        let connector = FlakyConnector::new(0, &[
            r#"{"type":"subscriptions","channels":[]}"#,
            "garbage",
            ticker("BTC-EUR", "20123.40").as_str(),
        ]);
        let backoff = CountingBackoff::default();

        let mut session = FeedSession::connect(&connector, "wss://feed", &backoff, &mut rx)
            .await
            .unwrap();
        let pairs = vec![TrackedPair::new("BTC", "EUR")];
        session.subscribe(&pairs, &["ticker".to_string()]).await.unwrap();
        assert_eq!(session.state(), SessionState::Streaming);

        let sent = connector.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains(r#""product_ids":["BTC-EUR"]"#));

        // ack decodes to an empty tick, surfaced to the caller
        let ack = session.next_tick().await.unwrap().unwrap();
        assert!(!ack.is_price_update());
        // malformed frame is skipped, not fatal
        assert!(session.next_tick().await.unwrap().is_none());
        let tick = session.next_tick().await.unwrap().unwrap();
        assert_eq!(tick.product_id, "BTC-EUR");
        // script exhausted: connection lost
        assert!(matches!(session.next_tick().await, Err(FeedError::Closed)));
        assert_eq!(session.state(), SessionState::Closed);
    }

    #[tokio::test]
    async fn test_into_ticks_skips_decode_failures_and_ends() {
        let (_tx, mut rx) = broadcast::channel(1);
        let connector = FlakyConnector::new(0, &[
            ticker("BTC-EUR", "1").as_str(),
            "{",
            ticker("ETH-EUR", "2").as_str(),
        ]);
        let session = FeedSession::connect(&connector, "u", &CountingBackoff::default(), &mut rx)
            .await
            .unwrap();

        let items: Vec<_> = session.into_ticks().collect().await;
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_ref().unwrap().product_id, "BTC-EUR");
        assert_eq!(items[1].as_ref().unwrap().product_id, "ETH-EUR");
        assert!(matches!(items[2], Err(FeedError::Closed)));
    }

    #[tokio::test]
    async fn test_subscribe_send_failure_closes_session() {
        let mut session = FeedSession {
            transport: ScriptedTransport {
                inbound: VecDeque::new(),
                sent: Arc::new(Mutex::new(Vec::new())),
                fail_send: true,
            },
            state: SessionState::Connected,
            attempts: 1,
        };

        let result = session.subscribe(&[TrackedPair::new("BTC", "EUR")], &[]).await;
        assert!(matches!(result, Err(FeedError::Send(_))));
        assert_eq!(session.state(), SessionState::Closed);
        assert!(matches!(session.subscribe(&[], &[]).await, Err(FeedError::Closed)));
    }
}
