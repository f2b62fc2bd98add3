//! Display Sink Port - Local Display Update Interface
//!
//! One narrow operation, `push`, shared by every display variant.
//! The router decides what to send and when; sinks only deliver.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::DisplayUpdate;

/// Errors raised while delivering an update to the display.
#[derive(Debug, Error)]
pub enum SinkError {
  #[error("HTTP request error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("display returned status {status}: {body}")]
  Status { status: u16, body: String },

  #[error("display I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("display handshake failed: {0}")]
  Handshake(String),

  #[error("display rejected update: {0}")]
  Rejected(String),

  #[error("failed to encode display request: {0}")]
  Encode(#[from] serde_json::Error),

  #[error("display did not answer within {0} ms")]
  Timeout(u64),
}

/// Trait for display update collaborators.
#[async_trait]
pub trait DisplaySink: Send + Sync {
  /// Deliver one update. Failures are reported, never retried here.
  async fn push(&self, update: &DisplayUpdate) -> Result<(), SinkError>;
}
