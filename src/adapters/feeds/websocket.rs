//! WebSocket Feed Transport - tokio-tungstenite Adapter
//!
//! Implements the `FeedConnector` / `FeedTransport` ports over a
//! TLS WebSocket. Pings are answered by tungstenite; pong and binary
//! frames are skipped.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info};

use crate::ports::feed_transport::{FeedConnector, FeedError, FeedTransport};

/// Opens WebSocket connections to the feed.
#[derive(Debug, Default, Clone, Copy)]
pub struct WsConnector;

/// One open WebSocket connection.
pub struct WsTransport {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl FeedConnector for WsConnector {
    type Transport = WsTransport;

    async fn connect(&self, url: &str) -> Result<WsTransport, FeedError> {
        let (stream, response) = connect_async(url)
            .await
            .map_err(|e| FeedError::Connect(e.to_string()))?;

        info!(url, status = %response.status(), "Feed WebSocket connected");

        Ok(WsTransport { stream })
    }
}

#[async_trait]
impl FeedTransport for WsTransport {
    async fn send_text(&mut self, text: String) -> Result<(), FeedError> {
        self.stream
            .send(Message::Text(text))
            .await
            .map_err(|e| FeedError::Send(e.to_string()))
    }

    async fn recv_text(&mut self) -> Result<String, FeedError> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Ok(text),
                Some(Ok(Message::Ping(data))) => {
                    debug!(len = data.len(), "Feed ping received");
                }
                Some(Ok(Message::Close(frame))) => {
                    info!(frame = ?frame, "Feed sent close frame");
                    return Err(FeedError::Closed);
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(FeedError::Transport(e.to_string())),
                None => return Err(FeedError::Closed),
            }
        }
    }
}
