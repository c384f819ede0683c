//! Duration parsing.
//!
//! Duration cells arrive as `8小时`, `1天`, a bare `8`, or a numeric cell.
//! Everything is normalized to hours.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::RowError;
use crate::models::Cell;

/// Hours in a standard working day.
pub const HOURS_PER_DAY: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Hours in half a working day.
pub const HALF_DAY_HOURS: Decimal = Decimal::from_parts(4, 0, 0, false, 0);

const HOUR_UNIT: &str = "小时";
const DAY_UNIT: &str = "天";

/// Parses a duration cell into hours.
///
/// Text containing `小时` is read as hours, text containing `天` as days of
/// [`HOURS_PER_DAY`] hours, and anything else as a bare number of hours.
/// Numeric cells are hours.
///
/// # Example
///
/// ```
/// use attendance_ledger::calculation::parse_duration_hours;
/// use attendance_ledger::models::Cell;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_duration_hours(&Cell::from("8小时")).unwrap(), Decimal::from(8));
/// assert_eq!(parse_duration_hours(&Cell::from("1.5天")).unwrap(), Decimal::from(12));
/// assert!(parse_duration_hours(&Cell::from("abc")).is_err());
/// ```
pub fn parse_duration_hours(cell: &Cell) -> Result<Decimal, RowError> {
    let text = match cell {
        Cell::Number(hours) => return Ok(*hours),
        Cell::Empty => {
            return Err(RowError::InvalidDuration { raw: String::new() });
        }
        Cell::Text(raw) => raw.trim(),
    };

    let invalid = || RowError::InvalidDuration {
        raw: text.to_string(),
    };

    if text.contains(HOUR_UNIT) {
        parse_number(&text.replace(HOUR_UNIT, "")).ok_or_else(invalid)
    } else if text.contains(DAY_UNIT) {
        parse_number(&text.replace(DAY_UNIT, ""))
            .and_then(|days| days.checked_mul(HOURS_PER_DAY))
            .ok_or_else(invalid)
    } else {
        parse_number(text).ok_or_else(invalid)
    }
}

fn parse_number(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text).ok()
}
