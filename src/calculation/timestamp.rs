//! Start/end time parsing.
//!
//! Exported attendance sheets are inconsistent about dates. A cell may hold
//! a full timestamp, a bare date, a date followed by `上午`/`下午`, or an Excel
//! date serial. Only the date part matters for the ledger, but the time of
//! day is kept when present.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::RowError;
use crate::models::Cell;

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y年%m月%d日"];

const SECONDS_PER_DAY: i64 = 86_400;

/// Parses a start or end time cell.
///
/// `column` is only used to describe the failure.
///
/// # Example
///
/// ```
/// use attendance_ledger::calculation::parse_timestamp;
/// use attendance_ledger::models::Cell;
/// use chrono::NaiveDate;
///
/// let parsed = parse_timestamp(&Cell::from("2024-03-15 下午"), "开始时间").unwrap();
/// assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
/// ```
pub fn parse_timestamp(cell: &Cell, column: &str) -> Result<NaiveDateTime, RowError> {
    let invalid = |raw: String| RowError::InvalidTimestamp {
        column: column.to_string(),
        raw,
    };

    match cell {
        Cell::Empty => Err(invalid(String::new())),
        Cell::Number(serial) => {
            excel_serial_to_datetime(*serial).ok_or_else(|| invalid(serial.to_string()))
        }
        Cell::Text(raw) => {
            let text = raw.trim();
            parse_text(text).ok_or_else(|| invalid(text.to_string()))
        }
    }
}

fn parse_text(text: &str) -> Option<NaiveDateTime> {
    if text.is_empty() {
        return None;
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
            return Some(datetime);
        }
    }

    // Date first, anything after the first whitespace (上午, 下午, 09:00) ignored
    let date_part = text.split_whitespace().next()?;
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Converts an Excel date serial (days since 1899-12-30) to a datetime.
pub fn excel_serial_to_datetime(serial: Decimal) -> Option<NaiveDateTime> {
    if serial.is_sign_negative() {
        return None;
    }
    let days = serial.trunc();
    let seconds = ((serial - days) * Decimal::from(SECONDS_PER_DAY))
        .round()
        .to_i64()?;
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_time(NaiveTime::MIN);
    epoch
        .checked_add_signed(Duration::try_days(days.to_i64()?)?)?
        .checked_add_signed(Duration::try_seconds(seconds)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn parse(s: &str) -> Result<NaiveDateTime, RowError> {
        parse_timestamp(&Cell::from(s), "开始时间")
    }

    #[test]
    fn test_full_timestamps() {
        assert_eq!(
            parse("2024-03-04 09:00:00").unwrap(),
            make_datetime("2024-03-04 09:00:00")
        );
        assert_eq!(
            parse("2024/03/04 09:30").unwrap(),
            make_datetime("2024-03-04 09:30:00")
        );
        assert_eq!(
            parse("2024-03-04T18:00:00").unwrap(),
            make_datetime("2024-03-04 18:00:00")
        );
    }

    #[test]
    fn test_date_with_half_day_suffix() {
        let midnight = make_datetime("2024-03-04 00:00:00");
        assert_eq!(parse("2024-03-04 上午").unwrap(), midnight);
        assert_eq!(parse("2024-03-04 下午").unwrap(), midnight);
    }

    #[test]
    fn test_bare_dates() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        assert_eq!(parse("2024-03-04").unwrap().date(), date);
        assert_eq!(parse("2024/3/4").unwrap().date(), date);
        assert_eq!(parse("2024.3.4").unwrap().date(), date);
        assert_eq!(parse("2024年3月4日").unwrap().date(), date);
    }

    #[test]
    fn test_excel_serial() {
        // 45355 is 2024-03-04
        let cell = Cell::Number(Decimal::from(45355));
        assert_eq!(
            parse_timestamp(&cell, "开始时间").unwrap(),
            make_datetime("2024-03-04 00:00:00")
        );

        let cell = Cell::Number(Decimal::from_str("45355.375").unwrap());
        assert_eq!(
            parse_timestamp(&cell, "开始时间").unwrap(),
            make_datetime("2024-03-04 09:00:00")
        );
    }

    #[test]
    fn test_invalid_values_name_the_column() {
        let err = parse_timestamp(&Cell::from("next tuesday"), "结束时间").unwrap_err();
        assert_eq!(
            err,
            RowError::InvalidTimestamp {
                column: "结束时间".to_string(),
                raw: "next tuesday".to_string(),
            }
        );
        assert!(parse_timestamp(&Cell::Empty, "结束时间").is_err());
        assert!(parse_timestamp(&Cell::Number(Decimal::from(-1)), "结束时间").is_err());
    }
}
