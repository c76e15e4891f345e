//! Wire types for the venue REST API.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

/// Standard response envelope: `{"status": "...", "data": ...}` on
/// success, `{"status": "error", "message": "...", "error_type": "..."}`
/// on failure.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct Envelope<T> {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    pub fn error_message(&self) -> String {
        match (&self.error_type, &self.message) {
            (Some(kind), Some(msg)) => format!("{kind}: {msg}"),
            (None, Some(msg)) => msg.clone(),
            _ => "unknown venue error".to_string(),
        }
    }
}

/// `/user/profile` payload (identity check only needs the ids).
#[derive(Debug, Deserialize)]
pub(crate) struct ProfileData {
    pub user_id: String,
    #[serde(default)]
    pub user_name: Option<String>,
}

/// `/session/token` payload.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenData {
    pub access_token: String,
}

/// `/orders/{variety}` payload.
#[derive(Debug, Deserialize)]
pub(crate) struct OrderData {
    pub order_id: String,
}

/// `/quote` payload: map from `"EXCHANGE:SYMBOL"` to per-instrument data.
pub(crate) type QuoteMap = HashMap<String, InstrumentQuote>;

#[derive(Debug, Deserialize)]
pub(crate) struct InstrumentQuote {
    pub depth: MarketDepth,
}

/// Visible order book, resting buy (bid) and sell (ask) levels,
/// best-first.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct MarketDepth {
    #[serde(default)]
    pub buy: Vec<DepthLevel>,
    #[serde(default)]
    pub sell: Vec<DepthLevel>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DepthLevel {
    /// The venue serializes prices as JSON numbers.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub quantity: u64,
    #[serde(default)]
    pub orders: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quote_envelope_deserializes() {
        let json = r#"{
            "status": "success",
            "data": {
                "NSE:INFY": {
                    "depth": {
                        "buy": [{"price": 150.25, "quantity": 40, "orders": 3}],
                        "sell": [{"price": 150.4, "quantity": 12, "orders": 1}]
                    }
                }
            }
        }"#;

        let envelope: Envelope<QuoteMap> = serde_json::from_str(json).unwrap();
        assert!(envelope.is_success());

        let data = envelope.data.unwrap();
        let quote = &data["NSE:INFY"];
        assert_eq!(quote.depth.buy[0].price, dec!(150.25));
        assert_eq!(quote.depth.buy[0].quantity, 40);
        assert_eq!(quote.depth.sell[0].price, dec!(150.4));
        assert_eq!(quote.depth.sell[0].orders, 1);
    }

    #[test]
    fn test_empty_depth_side_deserializes() {
        let json = r#"{"depth": {"buy": [], "sell": [{"price": 83.4}]}}"#;
        let quote: InstrumentQuote = serde_json::from_str(json).unwrap();
        assert!(quote.depth.buy.is_empty());
        assert_eq!(quote.depth.sell[0].price, dec!(83.4));
    }

    #[test]
    fn test_error_envelope_message() {
        let json = r#"{
            "status": "error",
            "message": "Insufficient funds",
            "error_type": "OrderException"
        }"#;

        let envelope: Envelope<OrderData> = serde_json::from_str(json).unwrap();
        assert!(!envelope.is_success());
        assert!(envelope.data.is_none());
        assert_eq!(envelope.error_message(), "OrderException: Insufficient funds");
    }

    #[test]
    fn test_order_envelope_deserializes() {
        let json = r#"{"status": "success", "data": {"order_id": "151220000000000"}}"#;
        let envelope: Envelope<OrderData> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.data.unwrap().order_id, "151220000000000");
    }
}
