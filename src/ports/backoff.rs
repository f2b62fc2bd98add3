//! Backoff Port - Delay Between Connection Attempts
//!
//! Injected into the feed session so tests can simulate any number of
//! failed connection attempts without real time passing.

use std::time::Duration;

use async_trait::async_trait;

/// Delay strategy applied after a failed connection attempt.
#[async_trait]
pub trait Backoff: Send + Sync {
  /// Pause after failed attempt number `attempt` (1-based).
  async fn wait(&self, attempt: u32);

  /// Delay that `wait` will apply for `attempt`.
  fn delay(&self, attempt: u32) -> Duration;
}
