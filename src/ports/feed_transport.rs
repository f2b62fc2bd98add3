//! Feed Transport Port - Streaming Connection Interface
//!
//! Splits "how to open a connection" from "how to move text frames"
//! so the feed session can be driven by a scripted transport in tests.

use async_trait::async_trait;
use thiserror::Error;

/// Connection-level feed failures.
///
/// Decode failures are not represented here: a message that cannot be
/// decoded is skipped, it does not end the session.
#[derive(Debug, Error)]
pub enum FeedError {
  #[error("feed connection failed: {0}")]
  Connect(String),

  #[error("failed to send to feed: {0}")]
  Send(String),

  #[error("feed transport error: {0}")]
  Transport(String),

  #[error("feed stream closed")]
  Closed,

  #[error("failed to encode subscription: {0}")]
  Encode(#[from] serde_json::Error),

  #[error("cancelled by shutdown signal")]
  Cancelled,
}

/// An open, bidirectional text-frame connection to the feed.
#[async_trait]
pub trait FeedTransport: Send {
  /// Send one text frame.
  async fn send_text(&mut self, text: String) -> Result<(), FeedError>;

  /// Wait for the next text frame.
  ///
  /// Control frames are handled internally; the end of the stream is
  /// reported as `FeedError::Closed`.
  async fn recv_text(&mut self) -> Result<String, FeedError>;
}

/// Opens transports to a feed endpoint.
#[async_trait]
pub trait FeedConnector: Send + Sync {
  type Transport: FeedTransport + 'static;

  /// Make a single connection attempt.
  async fn connect(&self, url: &str) -> Result<Self::Transport, FeedError>;
}
