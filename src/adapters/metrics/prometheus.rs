//! Prometheus Metrics Registry - Feed Observability
//!
//! Mirrors the indicator's `FeedStats` counters as Prometheus gauges,
//! refreshed from a snapshot on every scrape.

use prometheus::{Encoder, IntGauge, Opts, Registry, TextEncoder};

use crate::usecases::stats::StatsSnapshot;

/// Prometheus metrics for the indicator.
///
/// All metrics follow the naming convention `gdax_indicator_*`.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Feed connection status (1 = streaming, 0 = reconnecting).
    pub feed_streaming: IntGauge,
    /// Ticks delivered to the display.
    pub ticks_routed: IntGauge,
    /// Ticks without a usable pair identifier.
    pub ticks_discarded: IntGauge,
    /// Inbound messages that failed to decode.
    pub decode_failures: IntGauge,
    /// Display pushes that failed.
    pub push_failures: IntGauge,
    /// Feed sessions rebuilt after loss.
    pub reconnects: IntGauge,
}

impl MetricsRegistry {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let gauge = |name: &str, help: &str| -> anyhow::Result<IntGauge> {
            let gauge = IntGauge::with_opts(Opts::new(name, help))?;
            registry.register(Box::new(gauge.clone()))?;
            Ok(gauge)
        };

        let feed_streaming = gauge(
            "gdax_indicator_feed_streaming",
            "Whether a feed session is currently streaming",
        )?;
        let ticks_routed = gauge(
            "gdax_indicator_ticks_routed_total",
            "Ticks delivered to the display",
        )?;
        let ticks_discarded = gauge(
            "gdax_indicator_ticks_discarded_total",
            "Ticks without a usable pair identifier",
        )?;
        let decode_failures = gauge(
            "gdax_indicator_decode_failures_total",
            "Inbound feed messages that failed to decode",
        )?;
        let push_failures = gauge(
            "gdax_indicator_push_failures_total",
            "Display pushes that failed",
        )?;
        let reconnects = gauge(
            "gdax_indicator_reconnects_total",
            "Feed sessions rebuilt after loss",
        )?;

        Ok(Self {
            registry,
            feed_streaming,
            ticks_routed,
            ticks_discarded,
            decode_failures,
            push_failures,
            reconnects,
        })
    }

    /// Refresh all gauges from a stats snapshot.
    pub fn observe(&self, snapshot: &StatsSnapshot) {
        self.feed_streaming.set(i64::from(snapshot.streaming));
        self.ticks_routed.set(saturating_i64(snapshot.ticks_routed));
        self.ticks_discarded.set(saturating_i64(snapshot.ticks_discarded));
        self.decode_failures.set(saturating_i64(snapshot.decode_failures));
        self.push_failures.set(saturating_i64(snapshot.push_failures));
        self.reconnects.set(saturating_i64(snapshot.reconnects));
    }

    /// Encode all metrics in the Prometheus text format.
    pub fn encode(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
