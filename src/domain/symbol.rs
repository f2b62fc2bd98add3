//! Currency code to display glyph lookup.

use std::collections::HashMap;

/// Read-only mapping from currency codes to short display glyphs.
///
/// Lookup is an exact match on the code; unknown codes display as the
/// raw code.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: HashMap<String, String>,
}

impl SymbolTable {
    /// Table containing only the given entries.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            symbols: entries
                .into_iter()
                .map(|(code, glyph)| (code.into(), glyph.into()))
                .collect(),
        }
    }

    /// Default table extended (or overridden) by extra entries.
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut table = Self::default();
        table
            .symbols
            .extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        table
    }

    /// Glyph for `code`, or `code` itself when unknown.
    pub fn symbol<'a>(&'a self, code: &'a str) -> &'a str {
        self.symbols.get(code).map_or(code, String::as_str)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::from_entries([("EUR", "€"), ("BTC", "₿"), ("ETH", "Ξ"), ("LTC", "Ł")])
    }
}
