//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (WebSockets, HTTP, TCP).
//!
//! Adapter categories:
//! - `feeds`: GDAX WebSocket feed session
//! - `display`: Local display sinks (plain HTTP, structured stream)
//! - `metrics`: Health checks and Prometheus metrics

pub mod display;
pub mod feeds;
pub mod metrics;
