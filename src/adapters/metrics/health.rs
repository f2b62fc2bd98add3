//! Health Check Server - Liveness, Readiness and Metrics
//!
//! Exposes /live, /ready and /metrics via axum 0.7. Readiness follows
//! the feed: ready only while a session is streaming.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tokio::sync::broadcast;
use tracing::{info, instrument, warn};

use super::prometheus::MetricsRegistry;
use crate::usecases::stats::FeedStats;

/// State shared by the health handlers.
#[derive(Clone)]
struct HealthState {
    stats: Arc<FeedStats>,
    metrics: Arc<MetricsRegistry>,
}

/// Axum-based health check HTTP server.
pub struct HealthServer {
    /// Feed counters written by the indicator loop.
    stats: Arc<FeedStats>,
    /// Prometheus registry.
    metrics: Arc<MetricsRegistry>,
    /// Bind port.
    port: u16,
}

impl HealthServer {
    /// Create a new health server.
    pub fn new(stats: Arc<FeedStats>, metrics: Arc<MetricsRegistry>, port: u16) -> Self {
        Self {
            stats,
            metrics,
            port,
        }
    }

    /// Router serving /live, /ready and /metrics.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/live", get(Self::liveness))
            .route("/ready", get(Self::readiness))
            .route("/metrics", get(Self::metrics))
            .with_state(HealthState {
                stats: Arc::clone(&self.stats),
                metrics: Arc::clone(&self.metrics),
            })
    }

    /// Serve until the shutdown signal fires.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) -> anyhow::Result<()> {
        let app = self.router();

        let addr = format!("0.0.0.0:{}", self.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        info!(address = %addr, "Health server started");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        Ok(())
    }

    /// Liveness probe: always returns 200 if the process is running.
    async fn liveness() -> impl IntoResponse {
        (StatusCode::OK, "OK")
    }

    /// Readiness probe: returns 200 only while the feed is streaming.
    async fn readiness(State(state): State<HealthState>) -> impl IntoResponse {
        if state.stats.is_streaming() {
            (StatusCode::OK, "READY")
        } else {
            (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
        }
    }

    async fn metrics(State(state): State<HealthState>) -> impl IntoResponse {
        state.metrics.observe(&state.stats.snapshot());
        match state.metrics.encode() {
            Ok(body) => (StatusCode::OK, body),
            Err(e) => {
                warn!(error = %e, "Failed to encode metrics");
                (StatusCode::INTERNAL_SERVER_ERROR, String::new())
            }
        }
    }
}
