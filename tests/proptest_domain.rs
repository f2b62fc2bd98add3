//! Property-Based Tests — Domain Layer Invariants
//!
//! Uses `proptest` to verify that pair parsing, label formatting and
//! feed decoding hold across random inputs.

use proptest::prelude::*;

use gdax_indicator::adapters::feeds::gdax;
use gdax_indicator::domain::pair::parse_pairs;
use gdax_indicator::domain::update::{format_label, format_price};
use gdax_indicator::domain::{SymbolTable, TrackedPair, NOT_AVAILABLE};

/// Currency codes that are not in the default symbol table.
fn unknown_code() -> impl Strategy<Value = String> {
    "[A-Z]{3,5}".prop_filter("known code", |c| {
        !matches!(c.as_str(), "EUR" | "BTC" | "ETH" | "LTC")
    })
}

// ── Pair Properties ─────────────────────────────────────────

proptest! {
    /// Pairs keep configuration order and round-trip through product ids.
    #[test]
    fn pairs_preserve_order_and_product_ids(
        codes in prop::collection::vec(("[A-Z]{3,4}", "[A-Z]{3,4}"), 1..6),
    ) {
        let from = codes.iter().map(|(b, _)| b.as_str()).collect::<Vec<_>>().join(",");
        let to = codes.iter().map(|(_, q)| q.as_str()).collect::<Vec<_>>().join(",");

        let pairs = parse_pairs(&from, &to).unwrap();
        prop_assert_eq!(pairs.len(), codes.len());

        for (pair, (base, quote)) in pairs.iter().zip(&codes) {
            prop_assert_eq!(&pair.base, base);
            prop_assert_eq!(&pair.quote, quote);
            let round_trip = TrackedPair::from_product_id(&pair.product_id());
            prop_assert_eq!(round_trip.as_ref(), Some(pair));
        }
    }

    /// Lists of different lengths are always rejected.
    #[test]
    fn mismatched_lists_rejected(n in 1usize..6, m in 1usize..6) {
        prop_assume!(n != m);
        let from = vec!["BTC"; n].join(",");
        let to = vec!["EUR"; m].join(",");
        prop_assert!(parse_pairs(&from, &to).is_err());
    }
}

// ── Label Properties ────────────────────────────────────────

proptest! {
    /// Prices render as integers with no decimal point.
    #[test]
    fn price_has_no_fraction(price in 0.0f64..10_000_000.0) {
        let text = format_price(price);
        prop_assert!(!text.contains('.'), "unexpected fraction in {text}");
        let parsed: f64 = text.parse().unwrap();
        prop_assert!((parsed - price).abs() <= 0.5, "{price} rendered as {text}");
    }

    /// Unknown currency codes display as the raw code.
    #[test]
    fn unknown_codes_pass_through(base in unknown_code(), quote in unknown_code()) {
        let pair = TrackedPair::new(base.clone(), quote.clone());
        let label = format_label(&SymbolTable::default(), &pair, None);
        prop_assert_eq!(label, format!("{base}/{quote}: {NOT_AVAILABLE}"));
    }

    /// A routed label always carries the symbols and the rounded price.
    #[test]
    fn label_shape(price in 0.0f64..1_000_000.0) {
        let pair = TrackedPair::new("BTC", "EUR");
        let label = format_label(&SymbolTable::default(), &pair, Some(price));
        prop_assert_eq!(label, format!("₿/€: {}", format_price(price)));
    }
}

// ── Feed Decoding Properties ────────────────────────────────

proptest! {
    /// Arbitrary text never panics the decoder.
    #[test]
    fn decode_never_panics(text in ".*") {
        let _ = gdax::decode_tick(&text);
    }

    /// Ticker prices survive decoding.
    #[test]
    fn ticker_price_decoded(price in 0.01f64..1_000_000.0) {
        let text = format!(
            r#"{{"type":"ticker","product_id":"BTC-EUR","price":"{price}","last_size":"0.5"}}"#
        );
        let tick = gdax::decode_tick(&text).unwrap();
        prop_assert_eq!(tick.product_id.as_str(), "BTC-EUR");
        prop_assert!((tick.price - price).abs() < 1e-9);
    }
}
