//! Order queue model and the idempotent reconciliation loop.
//!
//! The queue is a spreadsheet worksheet: one row per requested order,
//! annotated in place once the order is on the venue. This crate owns
//! row screening, the `RowStore` abstraction with its sheets-backed and
//! in-memory implementations, and the `QueueReconciler` that drives
//! classify -> price -> submit -> record per eligible row.

pub mod error;
pub mod reconciler;
pub mod row;
pub mod sheets_store;
pub mod store;

pub use error::{QueueError, QueueResult};
pub use reconciler::{CycleStats, QueueReconciler, ReconcileSettings};
pub use row::{screen_row, RowScreen, PLACED_STATUS};
pub use sheets_store::SheetsRowStore;
pub use store::{MemoryRowStore, PlacedOutcome, RowStore};
