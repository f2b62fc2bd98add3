//! GDAX WebSocket Feed Protocol - Subscribe and Ticker Messages
//!
//! Encodes the single subscription message sent per session and
//! decodes inbound ticker messages into domain `Tick`s. Prices and
//! sizes arrive as JSON strings and are parsed with `str::parse`,
//! which rounds correctly to the nearest `f64`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Tick, TrackedPair};

/// Message type (and channel) carrying last-trade price updates.
pub const TICKER_CHANNEL: &str = "ticker";

/// Why an inbound message could not be turned into a tick.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid feed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("ticker for {product_id} has no {field}")]
    MissingField {
        product_id: String,
        field: &'static str,
    },

    #[error("invalid {field} {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("feed reported error: {0}")]
    FeedReported(String),
}

/// GDAX WebSocket subscribe message.
#[derive(Debug, Serialize)]
struct SubscribeMsg<'a> {
    #[serde(rename = "type")]
    msg_type: &'static str,
    product_ids: Vec<String>,
    channels: &'a [String],
}

/// GDAX WebSocket ticker message (and anything else the feed sends).
#[derive(Debug, Deserialize)]
struct TickerMsg {
    #[serde(rename = "type", default)]
    msg_type: String,
    #[serde(default)]
    product_id: String,
    price: Option<String>,
    last_size: Option<String>,
    message: Option<String>,
    reason: Option<String>,
}

/// Encode the subscription for every tracked pair.
pub fn encode_subscription(
    pairs: &[TrackedPair],
    channels: &[String],
) -> Result<String, serde_json::Error> {
    let msg = SubscribeMsg {
        msg_type: "subscribe",
        product_ids: pairs.iter().map(TrackedPair::product_id).collect(),
        channels,
    };
    serde_json::to_string(&msg)
}

/// Decode one inbound text frame.
///
/// Non-ticker messages (subscription acks, heartbeats) decode to an
/// empty tick so the caller can discard them.
pub fn decode_tick(text: &str) -> Result<Tick, DecodeError> {
    let msg: TickerMsg = serde_json::from_str(text)?;

    match msg.msg_type.as_str() {
        "error" => {
            let detail = match (msg.message, msg.reason) {
                (Some(m), Some(r)) => format!("{m}: {r}"),
                (Some(m), None) => m,
                (None, Some(r)) => r,
                (None, None) => "unknown".to_string(),
            };
            return Err(DecodeError::FeedReported(detail));
        }
        "" | TICKER_CHANNEL => {}
        _ => return Ok(Tick::empty()),
    }

    if msg.product_id.is_empty() {
        return Ok(Tick::empty());
    }

    let price = match msg.price {
        Some(raw) => parse_number("price", raw)?,
        None => {
            return Err(DecodeError::MissingField {
                product_id: msg.product_id,
                field: "price",
            });
        }
    };
    let last_size = msg
        .last_size
        .map(|raw| parse_number("last_size", raw))
        .transpose()?
        .unwrap_or_default();

    Ok(Tick::new(msg.product_id, price, last_size))
}

fn parse_number(field: &'static str, raw: String) -> Result<f64, DecodeError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(DecodeError::InvalidNumber { field, value: raw }),
    }
}
