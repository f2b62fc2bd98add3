//! Display Sink Adapters - Local Indicator Collaborators
//!
//! - `http`: Plain variant, `POST http://host:port/<id>` with the label as body
//! - `stream`: Structured variant, newline-delimited JSON over a local TCP channel

pub mod http;
pub mod stream;

pub use http::HttpDisplaySink;
pub use stream::StreamDisplaySink;
