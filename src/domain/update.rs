//! Display updates and label formatting.
//!
//! A `DisplayUpdate` is built fresh for every routed tick and for the
//! initial placeholder pass, then handed to a display sink. Labels look
//! like `₿/€: 20123`, or `₿/€: N/A` before any price is known.

use serde::Serialize;

use super::pair::TrackedPair;
use super::symbol::SymbolTable;

/// Label text shown until the first price arrives for a pair.
pub const NOT_AVAILABLE: &str = "N/A";

/// A single update pushed to the display collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayUpdate {
    /// Stable identifier, `indicator-<feed>-<base>-<quote>`.
    pub id: String,
    /// Human readable label.
    pub label: String,
    /// Optional icon path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Optional label-format guide used by some displays for width hints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_guide: Option<String>,
    /// Whether the indicator should be shown.
    pub active: bool,
}

impl DisplayUpdate {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: None,
            format_guide: None,
            active: true,
        }
    }

    pub fn with_icon(mut self, icon: Option<String>) -> Self {
        self.icon = icon;
        self
    }

    pub fn with_format_guide(mut self, guide: Option<String>) -> Self {
        self.format_guide = guide;
        self
    }
}

/// Render a price for display: rounded to the nearest integer, no decimals.
pub fn format_price(price: f64) -> String {
    format!("{price:.0}")
}

/// Build `<symbol(base)>/<symbol(quote)>: <price|N/A>`.
pub fn format_label(symbols: &SymbolTable, pair: &TrackedPair, price: Option<f64>) -> String {
    let value = price.map_or_else(|| NOT_AVAILABLE.to_string(), format_price);
    format!(
        "{}/{}: {value}",
        symbols.symbol(&pair.base),
        symbols.symbol(&pair.quote)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price_rounds() {
        assert_eq!(format_price(1234.56), "1235");
        assert_eq!(format_price(999.4), "999");
        assert_eq!(format_price(20123.40), "20123");
        assert_eq!(format_price(0.2), "0");
    }

    #[test]
    fn test_format_label() {
        let symbols = SymbolTable::default();
        let pair = TrackedPair::new("BTC", "EUR");
        assert_eq!(format_label(&symbols, &pair, Some(20123.40)), "₿/€: 20123");
        assert_eq!(format_label(&symbols, &pair, None), "₿/€: N/A");

        let unknown = TrackedPair::new("XYZ", "USD");
        assert_eq!(format_label(&symbols, &unknown, Some(1.6)), "XYZ/USD: 2");
    }

    #[test]
    fn test_update_serializes_without_empty_optionals() {
        let update = DisplayUpdate::new("indicator-gdax-BTC-EUR", "₿/€: N/A");
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["id"], "indicator-gdax-BTC-EUR");
        assert_eq!(json["active"], true);
        assert!(json.get("icon").is_none());

        let update = update.with_icon(Some("/tmp/btc.png".into()));
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["icon"], "/tmp/btc.png");
    }
}
