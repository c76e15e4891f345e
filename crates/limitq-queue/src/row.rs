//! Defensive screening of raw queue rows.
//!
//! Worksheet columns, 1-indexed: A=symbol, B=direction, C=quantity,
//! D=status, E=timestamp, F=limit price. Row 1 is the header. Rows can
//! arrive ragged (trailing blank cells are dropped by the sheet API), so
//! every access is bounds-checked and trimmed.

use limitq_core::{OrderIntent, Product, Side};
use std::str::FromStr;

/// Status value written once an order is on the venue. Comparison is
/// case-insensitive on read.
pub const PLACED_STATUS: &str = "Order_Placed";

/// Outcome of screening one raw row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowScreen {
    /// Required fields blank or unparsable; counted invalid, skipped
    /// every cycle, never mutated.
    Invalid(String),
    /// Already marked placed; the idempotency boundary.
    AlreadyPlaced,
    /// Eligible for submission.
    Ready(OrderIntent),
}

/// Screen one row of raw cell values into an order intent.
///
/// The status check runs after the blank test but before value parsing,
/// so an already-placed row is skipped no matter what its other cells
/// hold.
pub fn screen_row(fields: &[String], product: Option<Product>) -> RowScreen {
    let symbol = field(fields, 0);
    let direction = field(fields, 1);
    let quantity_raw = field(fields, 2);
    let status = field(fields, 3);

    if symbol.is_empty() || direction.is_empty() || quantity_raw.is_empty() {
        return RowScreen::Invalid("missing symbol, direction, or quantity".to_string());
    }

    if status.eq_ignore_ascii_case(PLACED_STATUS) {
        return RowScreen::AlreadyPlaced;
    }

    let side = match Side::from_str(direction) {
        Ok(side) => side,
        Err(_) => {
            return RowScreen::Invalid(format!("unrecognized direction '{direction}'"));
        }
    };

    let Some(quantity) = parse_quantity(quantity_raw) else {
        return RowScreen::Invalid(format!("unparsable quantity '{quantity_raw}'"));
    };

    RowScreen::Ready(OrderIntent::new(symbol, side, quantity, product))
}

fn field<'a>(fields: &'a [String], index: usize) -> &'a str {
    fields.get(index).map(|s| s.trim()).unwrap_or("")
}

/// Parse a quantity cell. Accepts integer or decimal text ("10", "10.0")
/// and truncates toward zero; anything non-finite or below one is
/// rejected.
fn parse_quantity(raw: &str) -> Option<u32> {
    let value = raw.parse::<f64>().ok()?;
    if !value.is_finite() || value < 1.0 {
        return None;
    }
    Some(value.trunc() as u32)
}
