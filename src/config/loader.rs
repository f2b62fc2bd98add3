//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)
    .with_context(|| format!("Invalid config file: {}", path.display()))?;

  info!(
    path = %path.display(),
    pairs = %config.pairs.from,
    quotes = %config.pairs.to,
    display = ?config.display.kind,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig = toml::from_str(content).context("Failed to parse config.toml")?;
  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Equal-length, non-blank base/quote lists
/// - A usable feed endpoint and at least one channel
/// - Positive reconnect delay and display timeout
fn validate_config(config: &AppConfig) -> Result<()> {
  config
    .tracked_pairs()
    .context("Invalid [pairs] from/to lists")?;

  anyhow::ensure!(
    !config.feed.ws_url.is_empty(),
    "Feed WebSocket URL must not be empty"
  );
  anyhow::ensure!(
    config.feed.ws_url.starts_with("ws://") || config.feed.ws_url.starts_with("wss://"),
    "Feed WebSocket URL must use ws:// or wss://, got {}",
    config.feed.ws_url
  );
  anyhow::ensure!(
    !config.feed.name.is_empty(),
    "Feed name must not be empty"
  );
  anyhow::ensure!(
    !config.feed.channels.is_empty(),
    "At least one feed channel must be configured"
  );
  anyhow::ensure!(
    config.feed.reconnect_delay_secs > 0,
    "reconnect_delay_secs must be positive"
  );

  anyhow::ensure!(
    config.display.port > 0,
    "Display port must be positive"
  );
  anyhow::ensure!(
    config.display.timeout_ms > 0,
    "Display timeout_ms must be positive"
  );

  Ok(())
}
