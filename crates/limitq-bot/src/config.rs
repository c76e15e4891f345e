//! Application configuration.

use crate::error::{AppError, AppResult};
use limitq_core::{Product, Variety};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the config file, overridden by `--config`.
pub const CONFIG_ENV: &str = "LIMITQ_CONFIG";

/// Environment variable holding the spreadsheet OAuth bearer token.
pub const SHEETS_TOKEN_ENV: &str = "LIMITQ_SHEETS_TOKEN";

/// Venue API endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KiteConfig {
    /// REST API base URL.
    #[serde(default = "default_kite_base_url")]
    pub base_url: String,
    /// Interactive login page, printed when re-authentication is needed.
    #[serde(default = "default_kite_login_url")]
    pub login_url: String,
}

fn default_kite_base_url() -> String {
    "https://api.kite.trade".to_string()
}

fn default_kite_login_url() -> String {
    "https://kite.trade/connect/login".to_string()
}

impl Default for KiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_kite_base_url(),
            login_url: default_kite_login_url(),
        }
    }
}

/// Spreadsheet layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetsConfig {
    /// Values API base URL.
    #[serde(default = "default_sheets_base_url")]
    pub base_url: String,
    /// Spreadsheet holding both the order queue and the credentials.
    pub spreadsheet_id: String,
    /// Worksheet with one order request per row.
    #[serde(default = "default_orders_worksheet")]
    pub orders_worksheet: String,
    /// Worksheet with API credentials in B1:B3.
    #[serde(default = "default_info_worksheet")]
    pub info_worksheet: String,
}

fn default_sheets_base_url() -> String {
    "https://sheets.googleapis.com".to_string()
}

fn default_orders_worksheet() -> String {
    "Place_Orders".to_string()
}

fn default_info_worksheet() -> String {
    "Info".to_string()
}

/// Reconciler knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Order variety for every submission. After-market by default;
    /// switch to `regular` for immediate placement.
    #[serde(default)]
    pub variety: Variety,
    /// Settlement product override. Unset means the per-exchange
    /// default (CNC for equities, NRML for derivatives).
    #[serde(default)]
    pub product: Option<Product>,
    /// Pause after each submission attempt (ms).
    #[serde(default = "default_row_delay_ms")]
    pub row_delay_ms: u64,
}

fn default_row_delay_ms() -> u64 {
    1_000
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            variety: Variety::default(),
            product: None,
            row_delay_ms: default_row_delay_ms(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Pause between reconciliation cycles (seconds).
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default)]
    pub kite: KiteConfig,
    pub sheets: SheetsConfig,
    #[serde(default)]
    pub reconcile: ReconcileConfig,
}

fn default_poll_interval_secs() -> u64 {
    10
}

impl AppConfig {
    /// Load configuration from the default location, honoring
    /// `LIMITQ_CONFIG`.
    pub fn load() -> AppResult<Self> {
        let config_path =
            std::env::var(CONFIG_ENV).unwrap_or_else(|_| "config/default.toml".to_string());

        if Path::new(&config_path).exists() {
            Self::from_file(&config_path)
        } else {
            Err(AppError::Config(format!(
                "Config file not found: {config_path}"
            )))
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }
}
