//! Feed Stats - Counters Shared with the Health Server

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use super::tick_router::RouteOutcome;

/// Running counters for the indicator loop.
#[derive(Debug, Default)]
pub struct FeedStats {
  streaming: AtomicBool,
  ticks_routed: AtomicU64,
  ticks_discarded: AtomicU64,
  decode_failures: AtomicU64,
  push_failures: AtomicU64,
  reconnects: AtomicU64,
}

/// Point-in-time copy of `FeedStats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
  pub streaming: bool,
  pub ticks_routed: u64,
  pub ticks_discarded: u64,
  pub decode_failures: u64,
  pub push_failures: u64,
  pub reconnects: u64,
}

impl FeedStats {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set_streaming(&self, streaming: bool) {
    self.streaming.store(streaming, Ordering::Relaxed);
  }

  pub fn is_streaming(&self) -> bool {
    self.streaming.load(Ordering::Relaxed)
  }

  pub fn record_route(&self, outcome: RouteOutcome) {
    let counter = match outcome {
      RouteOutcome::Pushed => &self.ticks_routed,
      RouteOutcome::Discarded | RouteOutcome::Malformed => &self.ticks_discarded,
      RouteOutcome::Failed => &self.push_failures,
    };
    counter.fetch_add(1, Ordering::Relaxed);
  }

  pub fn record_decode_failure(&self) {
    self.decode_failures.fetch_add(1, Ordering::Relaxed);
  }

  pub fn record_reconnect(&self) {
    self.reconnects.fetch_add(1, Ordering::Relaxed);
  }

  pub fn snapshot(&self) -> StatsSnapshot {
    StatsSnapshot {
      streaming: self.is_streaming(),
      ticks_routed: self.ticks_routed.load(Ordering::Relaxed),
      ticks_discarded: self.ticks_discarded.load(Ordering::Relaxed),
      decode_failures: self.decode_failures.load(Ordering::Relaxed),
      push_failures: self.push_failures.load(Ordering::Relaxed),
      reconnects: self.reconnects.load(Ordering::Relaxed),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_route_outcomes_counted() {
    let stats = FeedStats::new();
    stats.record_route(RouteOutcome::Pushed);
    stats.record_route(RouteOutcome::Pushed);
    stats.record_route(RouteOutcome::Discarded);
    stats.record_route(RouteOutcome::Malformed);
    stats.record_route(RouteOutcome::Failed);
    stats.record_decode_failure();
    stats.set_streaming(true);

    let snap = stats.snapshot();
    assert_eq!(snap.ticks_routed, 2);
    assert_eq!(snap.ticks_discarded, 2);
    assert_eq!(snap.push_failures, 1);
    assert_eq!(snap.decode_failures, 1);
    assert!(snap.streaming);
  }
}
