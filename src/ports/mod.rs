//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the use cases require from
//! the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `FeedConnector` / `FeedTransport`: Streaming feed connection
//! - `DisplaySink`: Local display update collaborator
//! - `Backoff`: Delay strategy between connection attempts

pub mod backoff;
pub mod display_sink;
pub mod feed_transport;
