//! Broker trait for price resolution and order submission.
//!
//! Abstracts the venue client so the queue reconciler can be driven
//! against a recording mock in tests.

use crate::error::{KiteError, KiteResult};
use limitq_core::{Exchange, LimitOrder, OrderId, Price, Side};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Trait over the two venue operations the reconciler drives.
pub trait Broker: Send + Sync {
    /// Resolve the passive limit price for one instrument and side.
    fn resolve_price<'a>(
        &'a self,
        exchange: Exchange,
        symbol: &'a str,
        side: Side,
    ) -> BoxFuture<'a, KiteResult<Price>>;

    /// Submit a single limit order.
    fn place_limit_order<'a>(&'a self, order: &'a LimitOrder) -> BoxFuture<'a, KiteResult<OrderId>>;
}

/// Recording mock broker for tests.
///
/// Prices are keyed by `"EXCHANGE:SYMBOL"`. Order submission succeeds
/// with sequential ids unless a failure is injected.
#[derive(Debug, Default)]
pub struct MockBroker {
    prices: Mutex<HashMap<String, KiteResult<Price>>>,
    quote_requests: Mutex<Vec<String>>,
    placed: Mutex<Vec<LimitOrder>>,
    order_failure: Mutex<Option<KiteError>>,
    next_order_seq: AtomicU64,
}

impl MockBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `price` for the given quote key (e.g. `"NSE:INFY"`).
    pub fn set_price(&self, key: impl Into<String>, price: Price) {
        self.prices.lock().insert(key.into(), Ok(price));
    }

    /// Fail quote resolution for the given key.
    pub fn fail_quote(&self, key: impl Into<String>, reason: impl Into<String>) {
        let key = key.into();
        let err = KiteError::QuoteUnavailable {
            key: key.clone(),
            reason: reason.into(),
        };
        self.prices.lock().insert(key, Err(err));
    }

    /// Make every subsequent submission fail with `error`.
    pub fn fail_orders(&self, error: KiteError) {
        *self.order_failure.lock() = Some(error);
    }

    /// Quote keys requested so far.
    pub fn quote_requests(&self) -> Vec<String> {
        self.quote_requests.lock().clone()
    }

    /// Orders submitted so far.
    pub fn placed_orders(&self) -> Vec<LimitOrder> {
        self.placed.lock().clone()
    }
}

impl Broker for MockBroker {
    fn resolve_price<'a>(
        &'a self,
        exchange: Exchange,
        symbol: &'a str,
        side: Side,
    ) -> BoxFuture<'a, KiteResult<Price>> {
        let _ = side;
        let key = exchange.quote_key(symbol);
        Box::pin(async move {
            self.quote_requests.lock().push(key.clone());
            self.prices
                .lock()
                .get(&key)
                .cloned()
                .unwrap_or(Err(KiteError::QuoteUnavailable {
                    key,
                    reason: "no mock price configured".to_string(),
                }))
        })
    }

    fn place_limit_order<'a>(&'a self, order: &'a LimitOrder) -> BoxFuture<'a, KiteResult<OrderId>> {
        Box::pin(async move {
            self.placed.lock().push(order.clone());
            if let Some(err) = self.order_failure.lock().clone() {
                return Err(err);
            }
            let seq = self.next_order_seq.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(OrderId::new(format!("MOCK-{seq}")))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use limitq_core::{Product, Variety};
    use rust_decimal_macros::dec;

    fn sample_order() -> LimitOrder {
        LimitOrder {
            variety: Variety::Amo,
            exchange: Exchange::Nse,
            symbol: "INFY".to_string(),
            side: Side::Buy,
            quantity: 5,
            product: Product::Cnc,
            price: Price::new(dec!(1500)),
        }
    }

    #[tokio::test]
    async fn test_mock_serves_configured_price() {
        let broker = MockBroker::new();
        broker.set_price("NSE:INFY", Price::new(dec!(1500.5)));

        let price = broker
            .resolve_price(Exchange::Nse, "INFY", Side::Buy)
            .await
            .unwrap();
        assert_eq!(price, Price::new(dec!(1500.5)));
        assert_eq!(broker.quote_requests(), vec!["NSE:INFY".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_unconfigured_symbol_is_unavailable() {
        let broker = MockBroker::new();
        let err = broker
            .resolve_price(Exchange::Nfo, "NIFTY24DEC22000CE", Side::Buy)
            .await
            .unwrap_err();
        assert!(matches!(err, KiteError::QuoteUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_mock_records_orders_and_issues_sequential_ids() {
        let broker = MockBroker::new();

        let first = broker.place_limit_order(&sample_order()).await.unwrap();
        let second = broker.place_limit_order(&sample_order()).await.unwrap();

        assert_eq!(first.as_str(), "MOCK-1");
        assert_eq!(second.as_str(), "MOCK-2");
        assert_eq!(broker.placed_orders().len(), 2);
    }

    #[tokio::test]
    async fn test_mock_injected_order_failure() {
        let broker = MockBroker::new();
        broker.fail_orders(KiteError::OrderRejected {
            message: "Insufficient funds".to_string(),
        });

        let err = broker.place_limit_order(&sample_order()).await.unwrap_err();
        assert!(matches!(err, KiteError::OrderRejected { .. }));
        // The attempt is still recorded.
        assert_eq!(broker.placed_orders().len(), 1);
    }
}
