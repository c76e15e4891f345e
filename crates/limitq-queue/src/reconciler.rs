//! Idempotent queue reconciliation.
//!
//! One cycle reads a full snapshot of the queue, screens each data row,
//! and drives classify -> resolve price -> submit -> record for every
//! eligible row. A row's failure is logged and contained: the row is
//! left untouched for the next cycle and processing moves on.

use crate::error::QueueResult;
use crate::row::{screen_row, RowScreen};
use crate::store::{PlacedOutcome, RowStore};
use limitq_core::{classify, LimitOrder, OrderIntent, Product, Variety};
use limitq_kite::Broker;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Timestamp format written to the queue's capture-time column.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Reconciler knobs, fixed per process.
#[derive(Debug, Clone)]
pub struct ReconcileSettings {
    /// Order variety every submission uses.
    pub variety: Variety,
    /// Settlement product override; `None` uses the per-exchange default.
    pub product: Option<Product>,
    /// Courtesy pause after each submission attempt.
    pub row_delay: Duration,
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self {
            variety: Variety::Amo,
            product: None,
            row_delay: Duration::from_secs(1),
        }
    }
}

/// Per-cycle tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    /// Rows submitted and durably marked placed this cycle.
    pub processed: u32,
    /// Rows already marked placed.
    pub skipped: u32,
    /// Rows with blank or unparsable required fields.
    pub invalid: u32,
}

/// Drives the queue: at most one submission attempt per row, ever, with
/// the row store as the single source of truth.
pub struct QueueReconciler {
    store: Arc<dyn RowStore>,
    broker: Arc<dyn Broker>,
    settings: ReconcileSettings,
}

impl QueueReconciler {
    pub fn new(store: Arc<dyn RowStore>, broker: Arc<dyn Broker>, settings: ReconcileSettings) -> Self {
        Self {
            store,
            broker,
            settings,
        }
    }

    /// Run one reconciliation cycle.
    ///
    /// Only a snapshot-read failure escapes; every row-level failure is
    /// logged, counted where applicable, and contained to its row.
    pub async fn reconcile(&self) -> QueueResult<CycleStats> {
        let rows = self.store.read_all_rows().await?;
        let mut stats = CycleStats::default();

        if rows.len() <= 1 {
            debug!("No data rows in queue");
            return Ok(stats);
        }

        // Row 1 is the header; sheet row numbers are 1-indexed.
        for (index, fields) in rows.iter().enumerate().skip(1) {
            let row_number = index + 1;

            match screen_row(fields, self.settings.product) {
                RowScreen::Invalid(reason) => {
                    warn!(row = row_number, %reason, "Invalid row, skipping");
                    stats.invalid += 1;
                }
                RowScreen::AlreadyPlaced => {
                    debug!(row = row_number, "Row already placed");
                    stats.skipped += 1;
                }
                RowScreen::Ready(intent) => {
                    if self.attempt_row(row_number, &intent).await {
                        stats.processed += 1;
                    }
                    // Courtesy pause toward the quote/order APIs after
                    // every attempt, successful or not.
                    tokio::time::sleep(self.settings.row_delay).await;
                }
            }
        }

        info!(
            total = rows.len() - 1,
            processed = stats.processed,
            skipped = stats.skipped,
            invalid = stats.invalid,
            "Reconcile cycle complete"
        );
        Ok(stats)
    }

    /// Submit one eligible row. Returns true only when the order was
    /// placed and the row durably marked.
    async fn attempt_row(&self, row_number: usize, intent: &OrderIntent) -> bool {
        let classification = classify(&intent.symbol, intent.product);
        debug!(
            row = row_number,
            symbol = %intent.symbol,
            exchange = %classification.exchange,
            product = %classification.product,
            "Classified row"
        );

        let price = match self
            .broker
            .resolve_price(classification.exchange, &intent.symbol, intent.side)
            .await
        {
            Ok(price) => price,
            Err(e) => {
                warn!(
                    row = row_number,
                    symbol = %intent.symbol,
                    error = %e,
                    "Quote resolution failed, row left for next cycle"
                );
                return false;
            }
        };

        let order = LimitOrder::assemble(intent, classification, self.settings.variety, price);
        info!(
            row = row_number,
            symbol = %order.symbol,
            side = %order.side,
            quantity = order.quantity,
            exchange = %order.exchange,
            product = %order.product,
            price = %order.price,
            "Submitting limit order"
        );

        let order_id = match self.broker.place_limit_order(&order).await {
            Ok(id) => id,
            Err(e) => {
                warn!(
                    row = row_number,
                    symbol = %order.symbol,
                    error = %e,
                    "Submission failed, row left for next cycle"
                );
                return false;
            }
        };

        let outcome = PlacedOutcome {
            timestamp: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
            limit_price: price,
        };

        match self.store.write_placed(row_number, &outcome).await {
            Ok(()) => {
                info!(row = row_number, order_id = %order_id, "Row marked placed");
                true
            }
            Err(e) => {
                // The order exists on the venue but the queue no longer
                // knows it: the row stays eligible and a duplicate is
                // possible next cycle.
                error!(
                    row = row_number,
                    order_id = %order_id,
                    error = %e,
                    "Status write failed after submission"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::PLACED_STATUS;
    use crate::store::MemoryRowStore;
    use limitq_kite::MockBroker;
    use limitq_core::{Exchange, Price, Product, Side};
    use rust_decimal_macros::dec;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn header() -> Vec<String> {
        row(&["Symbol", "Direction", "Quantity", "Status", "Timestamp", "Price"])
    }

    fn reconciler(
        store: Arc<MemoryRowStore>,
        broker: Arc<MockBroker>,
    ) -> QueueReconciler {
        let settings = ReconcileSettings {
            row_delay: Duration::ZERO,
            ..ReconcileSettings::default()
        };
        QueueReconciler::new(store, broker, settings)
    }

    #[tokio::test]
    async fn test_equity_row_end_to_end() {
        let store = Arc::new(MemoryRowStore::new(vec![
            header(),
            row(&["AAPL-EQ", "BUY", "10", ""]),
        ]));
        let broker = Arc::new(MockBroker::new());
        broker.set_price("NSE:AAPL-EQ", Price::new(dec!(150.25)));

        let stats = reconciler(store.clone(), broker.clone())
            .reconcile()
            .await
            .unwrap();

        assert_eq!(stats, CycleStats { processed: 1, skipped: 0, invalid: 0 });

        let orders = broker.placed_orders();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].exchange, Exchange::Nse);
        assert_eq!(orders[0].product, Product::Cnc);
        assert_eq!(orders[0].side, Side::Buy);
        assert_eq!(orders[0].price, Price::new(dec!(150.25)));

        let rows = store.rows();
        assert_eq!(rows[1][3], PLACED_STATUS);
        assert!(!rows[1][4].is_empty());
        assert_eq!(rows[1][5], "150.25");
    }

    #[tokio::test]
    async fn test_currency_derivative_row_routes_to_cds() {
        let store = Arc::new(MemoryRowStore::new(vec![
            header(),
            row(&["USDINR24DECFUT", "SELL", "1", ""]),
        ]));
        let broker = Arc::new(MockBroker::new());
        broker.set_price("CDS:USDINR24DECFUT", Price::new(dec!(83.40)));

        let stats = reconciler(store.clone(), broker.clone())
            .reconcile()
            .await
            .unwrap();
        assert_eq!(stats.processed, 1);

        let orders = broker.placed_orders();
        assert_eq!(orders[0].exchange, Exchange::Cds);
        assert_eq!(orders[0].product, Product::Nrml);
        assert_eq!(orders[0].price, Price::new(dec!(83.40)));
    }

    #[tokio::test]
    async fn test_index_option_row_routes_to_nfo() {
        let store = Arc::new(MemoryRowStore::new(vec![
            header(),
            row(&["NIFTY24DEC22000CE", "BUY", "50", ""]),
        ]));
        let broker = Arc::new(MockBroker::new());
        broker.set_price("NFO:NIFTY24DEC22000CE", Price::new(dec!(120.05)));

        reconciler(store, broker.clone()).reconcile().await.unwrap();

        let orders = broker.placed_orders();
        assert_eq!(orders[0].exchange, Exchange::Nfo);
        assert_eq!(orders[0].product, Product::Nrml);
        assert_eq!(orders[0].quantity, 50);
    }

    #[tokio::test]
    async fn test_reconcile_is_idempotent_across_cycles() {
        let store = Arc::new(MemoryRowStore::new(vec![
            header(),
            row(&["INFY", "BUY", "10", ""]),
        ]));
        let broker = Arc::new(MockBroker::new());
        broker.set_price("NSE:INFY", Price::new(dec!(1500)));

        let reconciler = reconciler(store, broker.clone());

        let first = reconciler.reconcile().await.unwrap();
        assert_eq!(first, CycleStats { processed: 1, skipped: 0, invalid: 0 });

        let second = reconciler.reconcile().await.unwrap();
        assert_eq!(second, CycleStats { processed: 0, skipped: 1, invalid: 0 });

        // Exactly one submission ever reached the venue.
        assert_eq!(broker.placed_orders().len(), 1);
    }

    #[tokio::test]
    async fn test_placed_row_makes_no_api_calls() {
        let store = Arc::new(MemoryRowStore::new(vec![
            header(),
            row(&["INFY", "BUY", "10", "ORDER_placed"]),
        ]));
        let broker = Arc::new(MockBroker::new());

        let stats = reconciler(store, broker.clone()).reconcile().await.unwrap();

        assert_eq!(stats, CycleStats { processed: 0, skipped: 1, invalid: 0 });
        assert!(broker.quote_requests().is_empty());
        assert!(broker.placed_orders().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_quantity_makes_no_api_calls() {
        let store = Arc::new(MemoryRowStore::new(vec![
            header(),
            row(&["INFY", "BUY", "abc", ""]),
        ]));
        let broker = Arc::new(MockBroker::new());

        let stats = reconciler(store.clone(), broker.clone())
            .reconcile()
            .await
            .unwrap();

        assert_eq!(stats, CycleStats { processed: 0, skipped: 0, invalid: 1 });
        assert!(broker.quote_requests().is_empty());
        assert!(broker.placed_orders().is_empty());
        // No mutation either.
        assert_eq!(store.rows()[1][3], "");
    }

    #[tokio::test]
    async fn test_failed_quote_isolated_from_valid_row() {
        let store = Arc::new(MemoryRowStore::new(vec![
            header(),
            row(&["NOQUOTE", "BUY", "5", ""]),
            row(&["INFY", "BUY", "10", ""]),
        ]));
        let broker = Arc::new(MockBroker::new());
        broker.fail_quote("NSE:NOQUOTE", "no resting bids");
        broker.set_price("NSE:INFY", Price::new(dec!(1500)));

        let stats = reconciler(store.clone(), broker.clone())
            .reconcile()
            .await
            .unwrap();

        // The failed row is neither processed nor invalid: it stays
        // eligible for the next cycle.
        assert_eq!(stats, CycleStats { processed: 1, skipped: 0, invalid: 0 });
        assert_eq!(store.rows()[1][3], "");
        assert_eq!(store.rows()[2][3], PLACED_STATUS);
        assert_eq!(broker.placed_orders().len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_order_leaves_row_eligible() {
        let store = Arc::new(MemoryRowStore::new(vec![
            header(),
            row(&["INFY", "BUY", "10", ""]),
        ]));
        let broker = Arc::new(MockBroker::new());
        broker.set_price("NSE:INFY", Price::new(dec!(1500)));
        broker.fail_orders(limitq_kite::KiteError::OrderRejected {
            message: "Insufficient funds".to_string(),
        });

        let stats = reconciler(store.clone(), broker).reconcile().await.unwrap();

        assert_eq!(stats, CycleStats { processed: 0, skipped: 0, invalid: 0 });
        assert_eq!(store.rows()[1][3], "");
    }

    #[tokio::test]
    async fn test_store_write_failure_is_all_or_nothing() {
        let store = Arc::new(MemoryRowStore::new(vec![
            header(),
            row(&["INFY", "BUY", "10", "", "", ""]),
        ]));
        let broker = Arc::new(MockBroker::new());
        broker.set_price("NSE:INFY", Price::new(dec!(1500)));
        store.fail_writes(true);

        let stats = reconciler(store.clone(), broker.clone())
            .reconcile()
            .await
            .unwrap();

        // Submitted but not recorded: not counted processed, and the
        // row's status/timestamp/price columns are all unchanged.
        assert_eq!(stats.processed, 0);
        assert_eq!(broker.placed_orders().len(), 1);
        let rows = store.rows();
        assert_eq!(rows[1][3], "");
        assert_eq!(rows[1][4], "");
        assert_eq!(rows[1][5], "");
    }

    #[tokio::test]
    async fn test_header_only_queue_is_a_quiet_cycle() {
        let store = Arc::new(MemoryRowStore::new(vec![header()]));
        let broker = Arc::new(MockBroker::new());

        let stats = reconciler(store, broker.clone()).reconcile().await.unwrap();
        assert_eq!(stats, CycleStats::default());
        assert!(broker.quote_requests().is_empty());
    }

    #[tokio::test]
    async fn test_mixed_queue_tallies() {
        let store = Arc::new(MemoryRowStore::new(vec![
            header(),
            row(&["INFY", "BUY", "10", "Order_Placed"]),
            row(&["TCS", "SELL", "x", ""]),
            row(&["WIPRO", "BUY", "3", ""]),
        ]));
        let broker = Arc::new(MockBroker::new());
        broker.set_price("NSE:WIPRO", Price::new(dec!(245.7)));

        let stats = reconciler(store, broker).reconcile().await.unwrap();
        assert_eq!(stats, CycleStats { processed: 1, skipped: 1, invalid: 1 });
    }
}
