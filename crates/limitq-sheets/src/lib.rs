//! Thin client for the Google Sheets values API.
//!
//! Covers exactly what the bot needs: read a range of cell values and
//! overwrite one range atomically. Spreadsheet authentication is a
//! pre-issued OAuth bearer token supplied by the environment.

pub mod client;
pub mod error;

pub use client::SheetsClient;
pub use error::{SheetsError, SheetsResult};
