//! HTTP client for the spreadsheet values API.

use crate::error::{SheetsError, SheetsResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default timeout for API requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Wire type for both reads and writes of a cell range. Other response
/// fields (range, majorDimension) are ignored.
///
/// Cells can come back as strings, numbers, or booleans depending on the
/// sheet formatting, so values stay as raw JSON until flattened.
#[derive(Debug, Serialize, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// Client for one spreadsheet.
pub struct SheetsClient {
    http: Client,
    base_url: String,
    spreadsheet_id: String,
    bearer_token: String,
}

impl SheetsClient {
    /// Create a client for a spreadsheet, authenticated with a
    /// pre-issued OAuth bearer token.
    pub fn new(
        base_url: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        bearer_token: impl Into<String>,
    ) -> SheetsResult<Self> {
        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| SheetsError::Http(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            spreadsheet_id: spreadsheet_id.into(),
            bearer_token: bearer_token.into(),
        })
    }

    /// Read all values in an A1 range (or a whole worksheet when the
    /// range is just the worksheet name). Rows are returned in sheet
    /// order with every cell flattened to a string.
    pub async fn get_values(&self, range: &str) -> SheetsResult<Vec<Vec<String>>> {
        let response = self
            .http
            .get(self.values_url(range))
            .bearer_auth(&self.bearer_token)
            .send()
            .await
            .map_err(|e| SheetsError::Http(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let value_range: ValueRange = response
            .json()
            .await
            .map_err(|e| SheetsError::Http(format!("Failed to parse response: {e}")))?;

        let rows: Vec<Vec<String>> = value_range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(flatten_cell).collect())
            .collect();

        debug!(range, row_count = rows.len(), "Fetched sheet values");
        Ok(rows)
    }

    /// Overwrite one A1 range with raw values. A single call, atomic for
    /// the range.
    pub async fn update_values(
        &self,
        range: &str,
        values: Vec<Vec<serde_json::Value>>,
    ) -> SheetsResult<()> {
        let body = ValueRange { values };

        let response = self
            .http
            .put(self.values_url(range))
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(&self.bearer_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| SheetsError::Http(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        debug!(range, "Updated sheet values");
        Ok(())
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{range}",
            self.base_url, self.spreadsheet_id
        )
    }
}

/// Flatten one cell to its displayed string form.
fn flatten_cell(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}
