//! HTTP Display Sink - Plain Label POST
//!
//! Sends each update as `POST http://<host>:<port>/<id>` with
//! `Content-Type: text/plain` and the label as the request body.
//! Icon, format guide and the active flag are not expressible in this
//! variant and are dropped.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::config::DisplayConfig;
use crate::domain::DisplayUpdate;
use crate::ports::display_sink::{DisplaySink, SinkError};

/// Display sink posting plain-text labels.
pub struct HttpDisplaySink {
  /// Underlying HTTP client.
  http: Client,
  /// Base URL, e.g. `http://localhost:15000`.
  base_url: String,
}

impl HttpDisplaySink {
  /// Create a sink posting to `base_url`.
  pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SinkError> {
    let http = Client::builder()
      .timeout(timeout)
      .pool_max_idle_per_host(2)
      .build()?;

    Ok(Self {
      http,
      base_url: base_url.into().trim_end_matches('/').to_string(),
    })
  }

  /// Create a sink for the configured local display port.
  pub fn from_config(config: &DisplayConfig) -> Result<Self, SinkError> {
    Self::new(
      format!("http://{}:{}", config.host, config.port),
      Duration::from_millis(config.timeout_ms),
    )
  }

  /// URL an update for `id` is posted to.
  pub fn url_for(&self, id: &str) -> String {
    format!("{}/{id}", self.base_url)
  }
}

#[async_trait]
impl DisplaySink for HttpDisplaySink {
  #[instrument(skip(self, update), fields(id = %update.id))]
  async fn push(&self, update: &DisplayUpdate) -> Result<(), SinkError> {
    let url = self.url_for(&update.id);

    let response = self
      .http
      .post(&url)
      .header(CONTENT_TYPE, "text/plain")
      .body(update.label.clone())
      .send()
      .await?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(SinkError::Status {
        status: status.as_u16(),
        body,
      });
    }

    debug!(label = %update.label, "Display updated");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_url_for_id() {
    let sink = HttpDisplaySink::new("http://localhost:15000/", Duration::from_secs(1)).unwrap();
    assert_eq!(
      sink.url_for("indicator-gdax-BTC-EUR"),
      "http://localhost:15000/indicator-gdax-BTC-EUR"
    );
  }
}
