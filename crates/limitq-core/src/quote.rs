//! Two-sided top-of-book quote.

use crate::decimal::Price;
use crate::order::Side;
use serde::{Deserialize, Serialize};

/// Best resting prices on both sides of the book.
///
/// Both sides are required: a one-sided market is a resolution failure
/// upstream, never a zero price here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub best_bid: Price,
    pub best_ask: Price,
}

impl Quote {
    pub fn new(best_bid: Price, best_ask: Price) -> Self {
        Self { best_bid, best_ask }
    }

    /// Passive limit price for the given side: join the best bid when
    /// buying, the best ask when selling. Favors fill probability over
    /// price improvement.
    pub fn join_price(&self, side: Side) -> Price {
        match side {
            Side::Buy => self.best_bid,
            Side::Sell => self.best_ask,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_join_price_sides() {
        let quote = Quote::new(Price::new(dec!(99.95)), Price::new(dec!(100.05)));
        assert_eq!(quote.join_price(Side::Buy), Price::new(dec!(99.95)));
        assert_eq!(quote.join_price(Side::Sell), Price::new(dec!(100.05)));
    }
}
