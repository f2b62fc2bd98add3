//! Market Data Feed Adapters - Streaming GDAX Ticker Feed
//!
//! - `gdax`: Wire protocol (subscribe / ticker messages)
//! - `websocket`: tokio-tungstenite transport
//! - `session`: Reconnecting feed session state machine
//! - `backoff`: Fixed reconnect delay

pub mod backoff;
pub mod gdax;
pub mod session;
pub mod websocket;

pub use backoff::FixedBackoff;
pub use session::{FeedSession, SessionState};
pub use websocket::{WsConnector, WsTransport};
