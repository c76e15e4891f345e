//! Error types for the venue client.

use thiserror::Error;

/// Venue client errors.
///
/// Transport failures are carried as strings so the error stays `Clone`
/// for recording in test doubles.
#[derive(Debug, Clone, Error)]
pub enum KiteError {
    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Venue API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Quote unavailable for {key}: {reason}")]
    QuoteUnavailable { key: String, reason: String },

    #[error("Order rejected: {message}")]
    OrderRejected { message: String },
}

/// Result type alias for venue operations.
pub type KiteResult<T> = Result<T, KiteError>;
