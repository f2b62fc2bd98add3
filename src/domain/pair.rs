//! Tracked currency pairs.
//!
//! A pair is built once at startup from the configured base and quote
//! lists and never changes afterwards. The feed addresses pairs as
//! `BASE-QUOTE` product identifiers; the display addresses them as
//! `indicator-<feed>-<base>-<quote>`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator between base and quote in a feed product identifier.
pub const PRODUCT_SEPARATOR: char = '-';

/// Errors raised while building pairs from configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PairError {
    #[error("missing from/to currency")]
    Empty,

    #[error("from/to don't match: {from} base currencies vs {to} quote currencies")]
    LengthMismatch { from: usize, to: usize },

    #[error("blank currency code at position {index}")]
    BlankCode { index: usize },
}

/// An ordered (base, quote) currency combination tracked for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackedPair {
    /// Base currency code (e.g. "BTC").
    pub base: String,
    /// Quote currency code (e.g. "EUR").
    pub quote: String,
}

impl TrackedPair {
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            quote: quote.into(),
        }
    }

    /// Feed product identifier, e.g. `BTC-EUR`.
    pub fn product_id(&self) -> String {
        format!("{}{PRODUCT_SEPARATOR}{}", self.base, self.quote)
    }

    /// Stable display identifier, e.g. `indicator-gdax-BTC-EUR`.
    pub fn indicator_id(&self, feed: &str) -> String {
        format!("indicator-{feed}-{}-{}", self.base, self.quote)
    }

    /// Split a feed product identifier back into a pair.
    ///
    /// Returns `None` when the identifier has no separator or either
    /// side is empty.
    pub fn from_product_id(product_id: &str) -> Option<Self> {
        let (base, quote) = product_id.split_once(PRODUCT_SEPARATOR)?;
        if base.is_empty() || quote.is_empty() {
            return None;
        }
        Some(Self::new(base, quote))
    }
}

impl fmt::Display for TrackedPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

/// Build the tracked pairs from comma-separated base and quote lists.
///
/// Pair `i` is `(from[i], to[i])`. Both lists must be non-empty, of
/// equal length, and free of blank entries.
pub fn parse_pairs(from: &str, to: &str) -> Result<Vec<TrackedPair>, PairError> {
    if from.trim().is_empty() || to.trim().is_empty() {
        return Err(PairError::Empty);
    }

    let bases: Vec<&str> = from.split(',').map(str::trim).collect();
    let quotes: Vec<&str> = to.split(',').map(str::trim).collect();

    if bases.len() != quotes.len() {
        return Err(PairError::LengthMismatch {
            from: bases.len(),
            to: quotes.len(),
        });
    }

    bases
        .into_iter()
        .zip(quotes)
        .enumerate()
        .map(|(index, (base, quote))| {
            if base.is_empty() || quote.is_empty() {
                Err(PairError::BlankCode { index })
            } else {
                Ok(TrackedPair::new(base, quote))
            }
        })
        .collect()
}
