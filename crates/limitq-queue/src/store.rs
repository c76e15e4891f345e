//! Row store abstraction.
//!
//! The store is the single source of truth for "has this row been
//! submitted"; the reconciler keeps no cache of its own. Implementations
//! must make `write_placed` atomic for the row: status, timestamp, and
//! price land together or not at all.

use crate::error::{QueueError, QueueResult};
use limitq_core::Price;
use parking_lot::Mutex;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// What gets written back to a row after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOutcome {
    /// Capture-time local timestamp, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    /// The realized limit price.
    pub limit_price: Price,
}

/// Durable, row-addressable order queue.
pub trait RowStore: Send + Sync {
    /// Full snapshot of all rows in sheet order, including the header.
    fn read_all_rows(&self) -> BoxFuture<'_, QueueResult<Vec<Vec<String>>>>;

    /// Atomically mark one row placed: status, timestamp, and limit
    /// price written to columns D:F in a single range write.
    /// `row_number` is 1-indexed sheet numbering (row 1 is the header).
    fn write_placed<'a>(
        &'a self,
        row_number: usize,
        outcome: &'a PlacedOutcome,
    ) -> BoxFuture<'a, QueueResult<()>>;
}

/// In-memory row store for tests.
///
/// Mirrors the worksheet shape (vector of rows of cells) and can inject
/// write failures without mutating the row, matching the all-or-nothing
/// contract.
#[derive(Debug, Default)]
pub struct MemoryRowStore {
    rows: Mutex<Vec<Vec<String>>>,
    fail_writes: AtomicBool,
}

impl MemoryRowStore {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self {
            rows: Mutex::new(rows),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make every subsequent write fail, leaving rows untouched.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Current snapshot of the stored rows.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.rows.lock().clone()
    }
}

impl RowStore for MemoryRowStore {
    fn read_all_rows(&self) -> BoxFuture<'_, QueueResult<Vec<Vec<String>>>> {
        Box::pin(async move { Ok(self.rows.lock().clone()) })
    }

    fn write_placed<'a>(
        &'a self,
        row_number: usize,
        outcome: &'a PlacedOutcome,
    ) -> BoxFuture<'a, QueueResult<()>> {
        Box::pin(async move {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(QueueError::StoreWrite("injected write failure".to_string()));
            }

            let mut rows = self.rows.lock();
            let row = rows
                .get_mut(row_number - 1)
                .ok_or_else(|| QueueError::StoreWrite(format!("no such row {row_number}")))?;
            if row.len() < 6 {
                row.resize(6, String::new());
            }
            row[3] = crate::row::PLACED_STATUS.to_string();
            row[4] = outcome.timestamp.clone();
            row[5] = outcome.limit_price.to_string();
            Ok(())
        })
    }
}
