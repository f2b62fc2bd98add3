//! Decoded feed price events.

/// One inbound price event.
///
/// An empty `product_id` means the message was not a price update and
/// must be discarded by the consumer.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Feed product identifier (e.g. "BTC-EUR"), possibly empty.
    pub product_id: String,
    /// Last trade price.
    pub price: f64,
    /// Size of the last trade.
    pub last_size: f64,
}

impl Tick {
    pub fn new(product_id: impl Into<String>, price: f64, last_size: f64) -> Self {
        Self {
            product_id: product_id.into(),
            price,
            last_size,
        }
    }

    /// A tick carrying no price update.
    pub fn empty() -> Self {
        Self::new(String::new(), 0.0, 0.0)
    }

    /// Whether this tick carries a price for some product.
    pub fn is_price_update(&self) -> bool {
        !self.product_id.is_empty()
    }
}
