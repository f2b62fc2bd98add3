//! GDAX Indicator — Entry Point
//!
//! Streams GDAX ticker prices into local desktop indicator labels.
//! Runs until SIGINT.
//!
//! Wiring sequence:
//! 1. Load config.toml + validate
//! 2. Init tracing (stdout or log file, optional JSON)
//! 3. Build the tracked pair list and symbol table
//! 4. Create the display sink (plain HTTP or structured stream)
//! 5. Spawn health server on :9090 (/live + /ready + /metrics) if enabled
//! 6. Spawn the indicator loop (placeholders, connect, subscribe, route)
//! 7. Wait for SIGINT → broadcast shutdown → join tasks

use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use gdax_indicator::adapters::display::{HttpDisplaySink, StreamDisplaySink};
use gdax_indicator::adapters::feeds::{FixedBackoff, WsConnector};
use gdax_indicator::adapters::metrics::{HealthServer, MetricsRegistry};
use gdax_indicator::config::{self, DisplayConfig, DisplayKind, IndicatorConfig};
use gdax_indicator::ports::display_sink::DisplaySink;
use gdax_indicator::usecases::{Indicator, IndicatorSettings, RouterSettings, TickRouter};

/// Config path used when none is given on the command line.
const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Environment variable naming the config path.
const CONFIG_ENV: &str = "GDAX_INDICATOR_CONFIG";

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_ENV).ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let config = config::loader::load_config(&config_path)
        .context("Failed to load configuration")?;

    // ── 2. Initialize logging ───────────────────────────────
    init_tracing(&config.indicator)?;

    info!(
        name = %config.indicator.name,
        version = env!("CARGO_PKG_VERSION"),
        feed = %config.feed.name,
        display = ?config.display.kind,
        "Starting GDAX indicator"
    );

    // ── 3. Pairs and symbols ────────────────────────────────
    let pairs = config.tracked_pairs().context("Invalid pair configuration")?;
    let symbols = config.symbol_table();

    // ── 4. Display sink ─────────────────────────────────────
    let sink = build_sink(&config.display).await?;

    let router = TickRouter::new(
        sink,
        symbols,
        RouterSettings {
            feed_name: config.feed.name.clone(),
            icon: config.display.icon.clone(),
            format_guide: config.display.format_guide.clone(),
        },
    );

    let indicator = Indicator::new(
        WsConnector,
        FixedBackoff::new(Duration::from_secs(config.feed.reconnect_delay_secs)),
        router,
        pairs,
        IndicatorSettings {
            ws_url: config.feed.ws_url.clone(),
            channels: config.feed.channels.clone(),
        },
    );
    let stats = indicator.stats();

    let (shutdown_tx, _shutdown_rx) = broadcast::channel::<()>(1);

    // ── 5. Health/metrics server ────────────────────────────
    let health_handle = if config.health.enabled {
        let metrics = Arc::new(MetricsRegistry::new().context("Failed to create metrics")?);
        let server = HealthServer::new(Arc::clone(&stats), metrics, config.health.port);
        let health_shutdown = shutdown_tx.subscribe();
        Some(tokio::spawn(async move {
            if let Err(e) = server.run(health_shutdown).await {
                error!(error = %e, "Health server failed");
            }
        }))
    } else {
        None
    };

    // ── 6. Indicator loop ───────────────────────────────────
    let indicator_shutdown = shutdown_tx.subscribe();
    let indicator_handle = tokio::spawn(async move {
        if let Err(e) = indicator.run(indicator_shutdown).await {
            error!(error = %e, "Indicator loop failed");
        }
    });

    info!("All tasks spawned — indicator is running");

    // ── 7. Wait for SIGINT ──────────────────────────────────
    signal::ctrl_c()
        .await
        .context("Failed to listen for SIGINT")?;
    info!("SIGINT received, initiating graceful shutdown");

    let _ = shutdown_tx.send(());

    let _ = tokio::time::timeout(Duration::from_secs(5), indicator_handle).await;

    if let Some(handle) = health_handle {
        let _ = tokio::time::timeout(Duration::from_secs(2), handle).await;
    }

    let snapshot = stats.snapshot();
    info!(
        ticks_routed = snapshot.ticks_routed,
        reconnects = snapshot.reconnects,
        "Shutdown complete"
    );
    Ok(())
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the configured level. With `log_file` set, logs
/// are appended to that file without ANSI colors.
fn init_tracing(config: &IndicatorConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match (&config.log_file, config.json_logs) {
        (Some(path), json) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {path}"))?;
            let builder = builder.with_ansi(false).with_writer(Mutex::new(file));
            if json {
                builder.json().init();
            } else {
                builder.init();
            }
        }
        (None, true) => builder.json().init(),
        (None, false) => builder.init(),
    }

    Ok(())
}

/// Create the configured display sink.
///
/// The stream variant performs its handshake here; a display that
/// cannot be reached at startup is fatal.
async fn build_sink(config: &DisplayConfig) -> Result<Arc<dyn DisplaySink>> {
    let sink: Arc<dyn DisplaySink> = match config.kind {
        DisplayKind::Http => Arc::new(
            HttpDisplaySink::from_config(config).context("Failed to create HTTP display sink")?,
        ),
        DisplayKind::Stream => Arc::new(
            StreamDisplaySink::from_config(config)
                .await
                .context("Failed to open display channel")?,
        ),
    };
    Ok(sink)
}
