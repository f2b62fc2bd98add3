//! Use Cases Layer - Application Logic
//!
//! Orchestrates the feed session and the display sink.
//!
//! Use cases:
//! - `TickRouter`: Tick -> DisplayUpdate -> display sink
//! - `Indicator`: Placeholder pass, then the reconnecting stream loop
//! - `FeedStats`: Counters shared with the health server

pub mod indicator;
pub mod stats;
pub mod tick_router;

pub use indicator::{Indicator, IndicatorSettings};
pub use stats::{FeedStats, StatsSnapshot};
pub use tick_router::{RouteOutcome, RouterSettings, TickRouter};
