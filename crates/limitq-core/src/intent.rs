//! Order intent and its venue classification.

use crate::order::{Exchange, Product, Side};
use serde::{Deserialize, Serialize};

/// What a queue row asks for: symbol, side, quantity, and optionally an
/// explicit settlement product.
///
/// Immutable once built; the exchange and a concrete product are derived
/// by [`crate::classify`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderIntent {
    pub symbol: String,
    pub side: Side,
    /// Number of units; always positive.
    pub quantity: u32,
    /// Explicit product, if the caller supplied one. `None` means the
    /// classifier picks the per-exchange default.
    pub product: Option<Product>,
}

impl OrderIntent {
    pub fn new(symbol: impl Into<String>, side: Side, quantity: u32, product: Option<Product>) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            quantity,
            product,
        }
    }
}

/// Venue routing for an intent: the exchange segment and a concrete
/// settlement product. The product is never left unset here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub exchange: Exchange,
    pub product: Product,
}
