//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Credential error: {0}")]
    Credentials(String),

    #[error("Venue error: {0}")]
    Kite(#[from] limitq_kite::KiteError),

    #[error("Sheets error: {0}")]
    Sheets(#[from] limitq_sheets::SheetsError),

    #[error("Queue error: {0}")]
    Queue(#[from] limitq_queue::QueueError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] limitq_telemetry::TelemetryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
