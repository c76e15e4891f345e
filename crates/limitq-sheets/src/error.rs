//! Error types for the sheets client.

use thiserror::Error;

/// Sheets client errors.
#[derive(Debug, Clone, Error)]
pub enum SheetsError {
    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("Sheets API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
}

/// Result type alias for sheets operations.
pub type SheetsResult<T> = Result<T, SheetsError>;
