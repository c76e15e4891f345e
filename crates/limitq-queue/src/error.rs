//! Error types for queue operations.

use thiserror::Error;

/// Queue errors. Row-level problems (bad input, failed quote, rejected
/// order) are counted and logged by the reconciler, never raised; only
/// store transport failures surface here.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Row store error: {0}")]
    Store(#[from] limitq_sheets::SheetsError),

    #[error("Row store write failed: {0}")]
    StoreWrite(String),
}

/// Result type alias for queue operations.
pub type QueueResult<T> = Result<T, QueueError>;
