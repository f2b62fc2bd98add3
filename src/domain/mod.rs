//! Domain layer - Pairs, ticks, symbols and display updates.
//!
//! Pure types with no I/O. Everything here is constructed from the
//! validated configuration or from decoded feed messages and is
//! testable in isolation.

pub mod pair;
pub mod symbol;
pub mod tick;
pub mod update;

// Re-export core types for convenience
pub use pair::{PairError, TrackedPair};
pub use symbol::SymbolTable;
pub use tick::Tick;
pub use update::{DisplayUpdate, NOT_AVAILABLE};
