//! Configuration Module - TOML-based Indicator Configuration
//!
//! Loads and validates configuration from `config.toml`. The validated
//! value is immutable and passed into constructors; nothing here is
//! process-wide mutable state.

pub mod loader;

use std::collections::HashMap;

use serde::Deserialize;

use crate::domain::pair::{parse_pairs, PairError};
use crate::domain::{SymbolTable, TrackedPair};

/// Public GDAX WebSocket feed.
pub const DEFAULT_WS_URL: &str = "wss://ws-feed.gdax.com";

/// Channel subscribed to when none are configured.
pub const DEFAULT_CHANNEL: &str = "ticker";

/// Top-level indicator configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Process identity and logging.
  #[serde(default)]
  pub indicator: IndicatorConfig,
  /// Streaming feed endpoint.
  #[serde(default)]
  pub feed: FeedConfig,
  /// Tracked currency pairs.
  pub pairs: PairsConfig,
  /// Local display collaborator.
  #[serde(default)]
  pub display: DisplayConfig,
  /// Health and metrics endpoints.
  #[serde(default)]
  pub health: HealthConfig,
}

impl AppConfig {
  /// Build the ordered pair list from the `from` / `to` lists.
  pub fn tracked_pairs(&self) -> Result<Vec<TrackedPair>, PairError> {
    parse_pairs(&self.pairs.from, &self.pairs.to)
  }

  /// Default symbols merged with `[display.symbols]`.
  pub fn symbol_table(&self) -> SymbolTable {
    SymbolTable::with_overrides(&self.display.symbols)
  }
}

/// Process identity and logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct IndicatorConfig {
  /// Human-readable name.
  #[serde(default = "default_name")]
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
  /// Append logs to this file instead of stdout.
  pub log_file: Option<String>,
  /// Emit JSON log lines.
  #[serde(default)]
  pub json_logs: bool,
}

/// Streaming feed configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
  /// Feed name used in display identifiers (`indicator-<name>-...`).
  #[serde(default = "default_feed_name")]
  pub name: String,
  /// WebSocket endpoint.
  #[serde(default = "default_ws_url")]
  pub ws_url: String,
  /// Delay between connection attempts (seconds).
  #[serde(default = "default_reconnect_delay")]
  pub reconnect_delay_secs: u64,
  /// Channels named in the subscription.
  #[serde(default = "default_channels")]
  pub channels: Vec<String>,
}

/// Tracked pairs in their external, comma-separated form.
#[derive(Debug, Clone, Deserialize)]
pub struct PairsConfig {
  /// Base currencies, e.g. "BTC,ETH".
  pub from: String,
  /// Quote currencies, e.g. "EUR,EUR".
  pub to: String,
}

/// Which display update signature the collaborator speaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayKind {
  /// Label-only POST to `http://host:port/<id>`.
  #[default]
  Http,
  /// Structured requests over a local channel.
  Stream,
}

/// Local display collaborator configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
  #[serde(default)]
  pub kind: DisplayKind,
  #[serde(default = "default_display_host")]
  pub host: String,
  #[serde(default = "default_display_port")]
  pub port: u16,
  /// Icon path sent with every update.
  pub icon: Option<String>,
  /// Label-format guide for column-width hints, e.g. "AAA/BBB: 123456789".
  pub format_guide: Option<String>,
  /// Per-update timeout (milliseconds).
  #[serde(default = "default_display_timeout")]
  pub timeout_ms: u64,
  /// Extra or overriding currency glyphs.
  #[serde(default)]
  pub symbols: HashMap<String, String>,
}

/// Health and metrics server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthConfig {
  #[serde(default)]
  pub enabled: bool,
  #[serde(default = "default_health_port")]
  pub port: u16,
}

impl Default for IndicatorConfig {
  fn default() -> Self {
    Self {
      name: default_name(),
      log_level: default_log_level(),
      log_file: None,
      json_logs: false,
    }
  }
}

impl Default for FeedConfig {
  fn default() -> Self {
    Self {
      name: default_feed_name(),
      ws_url: default_ws_url(),
      reconnect_delay_secs: default_reconnect_delay(),
      channels: default_channels(),
    }
  }
}

impl Default for DisplayConfig {
  fn default() -> Self {
    Self {
      kind: DisplayKind::default(),
      host: default_display_host(),
      port: default_display_port(),
      icon: None,
      format_guide: None,
      timeout_ms: default_display_timeout(),
      symbols: HashMap::new(),
    }
  }
}

impl Default for HealthConfig {
  fn default() -> Self {
    Self {
      enabled: false,
      port: default_health_port(),
    }
  }
}

// Default value functions for serde

fn default_name() -> String {
  "gdax-indicator".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_feed_name() -> String {
  "gdax".to_string()
}

fn default_ws_url() -> String {
  DEFAULT_WS_URL.to_string()
}

fn default_reconnect_delay() -> u64 {
  5
}

fn default_channels() -> Vec<String> {
  vec![DEFAULT_CHANNEL.to_string()]
}

fn default_display_host() -> String {
  "localhost".to_string()
}

fn default_display_port() -> u16 {
  15000
}

fn default_display_timeout() -> u64 {
  2000
}

fn default_health_port() -> u16 {
  9090
}
