//! Error types for limitq-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid side: {0}")]
    InvalidSide(String),

    #[error("Invalid product: {0}")]
    InvalidProduct(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
