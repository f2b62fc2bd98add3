//! Stream Display Sink - Structured Requests over a Local Channel
//!
//! Speaks newline-delimited JSON over TCP to the local display:
//! a `hello` handshake when the channel opens, then one `update`
//! request per push, each answered by an `{"ok": bool, "error": ..}`
//! acknowledgement. A broken channel is reopened on the next push.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::config::DisplayConfig;
use crate::domain::DisplayUpdate;
use crate::ports::display_sink::{DisplaySink, SinkError};

/// Client name announced in the handshake.
const CLIENT_NAME: &str = env!("CARGO_PKG_NAME");

/// Request sent to the display.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Request<'a> {
  Hello {
    client: &'static str,
    version: &'static str,
  },
  Update(&'a DisplayUpdate),
}

/// Acknowledgement returned by the display.
#[derive(Debug, Deserialize)]
struct Ack {
  ok: bool,
  #[serde(default)]
  error: Option<String>,
}

struct Channel {
  reader: BufReader<OwnedReadHalf>,
  writer: OwnedWriteHalf,
}

/// Display sink speaking the structured request protocol.
pub struct StreamDisplaySink {
  /// Display address, e.g. `localhost:15000`.
  addr: String,
  /// Per-request timeout.
  timeout: Duration,
  /// Open channel, `None` after a failure until the next push.
  channel: Mutex<Option<Channel>>,
}

impl StreamDisplaySink {
  /// Open the channel and complete the handshake.
  ///
  /// # Errors
  /// Fails if the display is unreachable or rejects the handshake.
  pub async fn connect(addr: impl Into<String>, timeout: Duration) -> Result<Self, SinkError> {
    let addr = addr.into();
    let channel = open_channel(&addr, timeout).await?;

    info!(addr = %addr, "Display channel handshake complete");

    Ok(Self {
      addr,
      timeout,
      channel: Mutex::new(Some(channel)),
    })
  }

  /// Connect to the configured local display port.
  pub async fn from_config(config: &DisplayConfig) -> Result<Self, SinkError> {
    Self::connect(
      format!("{}:{}", config.host, config.port),
      Duration::from_millis(config.timeout_ms),
    )
    .await
  }
}

#[async_trait]
impl DisplaySink for StreamDisplaySink {
  #[instrument(skip(self, update), fields(id = %update.id))]
  async fn push(&self, update: &DisplayUpdate) -> Result<(), SinkError> {
    let mut guard = self.channel.lock().await;

    if guard.is_none() {
      debug!(addr = %self.addr, "Reopening display channel");
      *guard = Some(open_channel(&self.addr, self.timeout).await?);
    }

    let Some(channel) = guard.as_mut() else {
      return Err(SinkError::Handshake("display channel unavailable".into()));
    };

    match request(channel, &Request::Update(update), self.timeout).await {
      Ok(()) => Ok(()),
      Err(e @ SinkError::Rejected(_)) => Err(e),
      Err(e) => {
        warn!(error = %e, "Display channel broken, will reopen");
        *guard = None;
        Err(e)
      }
    }
  }
}

async fn open_channel(addr: &str, timeout: Duration) -> Result<Channel, SinkError> {
  let stream = tokio::time::timeout(timeout, TcpStream::connect(addr))
    .await
    .map_err(|_| SinkError::Timeout(millis(timeout)))??;
  stream.set_nodelay(true)?;

  let (read, writer) = stream.into_split();
  let mut channel = Channel {
    reader: BufReader::new(read),
    writer,
  };

  let hello = Request::Hello {
    client: CLIENT_NAME,
    version: env!("CARGO_PKG_VERSION"),
  };
  request(&mut channel, &hello, timeout)
    .await
    .map_err(|e| SinkError::Handshake(e.to_string()))?;

  Ok(channel)
}

async fn request(channel: &mut Channel, req: &Request<'_>, timeout: Duration) -> Result<(), SinkError> {
  let mut line = serde_json::to_string(req)?;
  line.push('\n');

  let exchange = async {
    channel.writer.write_all(line.as_bytes()).await?;
    channel.writer.flush().await?;

    let mut reply = String::new();
    if channel.reader.read_line(&mut reply).await? == 0 {
      return Err(SinkError::Io(std::io::ErrorKind::UnexpectedEof.into()));
    }
    Ok(serde_json::from_str::<Ack>(reply.trim())?)
  };

  let ack = tokio::time::timeout(timeout, exchange)
    .await
    .map_err(|_| SinkError::Timeout(millis(timeout)))??;

  if ack.ok {
    Ok(())
  } else {
    Err(SinkError::Rejected(ack.error.unwrap_or_else(|| "no reason given".into())))
  }
}

fn millis(d: Duration) -> u64 {
  u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
