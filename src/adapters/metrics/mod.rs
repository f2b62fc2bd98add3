//! Metrics and Monitoring Adapters
//!
//! Provides health check endpoints (/live, /ready) and Prometheus
//! metrics (/metrics) via axum 0.7.

pub mod health;
pub mod prometheus;

pub use health::HealthServer;
pub use prometheus::MetricsRegistry;
