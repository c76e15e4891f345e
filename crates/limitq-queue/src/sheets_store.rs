//! Sheets-backed row store.

use crate::error::QueueResult;
use crate::row::PLACED_STATUS;
use crate::store::{BoxFuture, PlacedOutcome, RowStore};
use limitq_sheets::SheetsClient;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;

/// Row store over one worksheet of a spreadsheet.
pub struct SheetsRowStore {
    client: SheetsClient,
    worksheet: String,
}

impl SheetsRowStore {
    pub fn new(client: SheetsClient, worksheet: impl Into<String>) -> Self {
        Self {
            client,
            worksheet: worksheet.into(),
        }
    }

    /// A1 range for the status/timestamp/price columns of one row.
    fn placed_range(&self, row_number: usize) -> String {
        format!("{}!D{row_number}:F{row_number}", self.worksheet)
    }
}

impl RowStore for SheetsRowStore {
    fn read_all_rows(&self) -> BoxFuture<'_, QueueResult<Vec<Vec<String>>>> {
        Box::pin(async move { Ok(self.client.get_values(&self.worksheet).await?) })
    }

    fn write_placed<'a>(
        &'a self,
        row_number: usize,
        outcome: &'a PlacedOutcome,
    ) -> BoxFuture<'a, QueueResult<()>> {
        Box::pin(async move {
            // One range update covers all three columns; the sheet
            // applies it atomically.
            let price_cell = outcome
                .limit_price
                .inner()
                .to_f64()
                .map(Value::from)
                .unwrap_or_else(|| Value::from(outcome.limit_price.to_string()));

            let values = vec![vec![
                Value::from(PLACED_STATUS),
                Value::from(outcome.timestamp.as_str()),
                price_cell,
            ]];

            self.client
                .update_values(&self.placed_range(row_number), values)
                .await?;
            Ok(())
        })
    }
}
