//! Fixed-interval reconnect delay.

use std::time::Duration;

use async_trait::async_trait;

use crate::ports::backoff::Backoff;

/// Sleeps the same delay after every failed attempt.
#[derive(Debug, Clone, Copy)]
pub struct FixedBackoff {
    delay: Duration,
}

impl FixedBackoff {
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for FixedBackoff {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

#[async_trait]
impl Backoff for FixedBackoff {
    async fn wait(&self, _attempt: u32) {
        tokio::time::sleep(self.delay).await;
    }

    fn delay(&self, _attempt: u32) -> Duration {
        self.delay
    }
}
