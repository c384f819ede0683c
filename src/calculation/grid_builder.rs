//! Ledger grid construction.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{
    GridCell, LEAVE_HEADER, LedgerBook, LedgerGrid, LedgerRow, NAME_HEADER, NET_DAYS_HEADER,
    NET_HOURS_HEADER, OVERTIME_HEADER, PersonLedger, TargetMonth,
};

/// Rounds a value for display.
///
/// Whole numbers are returned without a fractional part; anything else is
/// rounded to one decimal place, half away from zero.
///
/// # Example
///
/// ```
/// use attendance_ledger::calculation::format_number;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(format_number(Decimal::from_str("8.00").unwrap()).to_string(), "8");
/// assert_eq!(format_number(Decimal::from_str("2.25").unwrap()).to_string(), "2.3");
/// assert_eq!(format_number(Decimal::from_str("-2.25").unwrap()).to_string(), "-2.3");
/// ```
pub fn format_number(value: Decimal) -> Decimal {
    if value.fract().is_zero() {
        value.trunc().normalize()
    } else {
        value
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
            .normalize()
    }
}

/// Lays out a finished ledger book as a grid for `month`.
///
/// Rows follow the book's first-appearance order. Day cells with no value or
/// a zero value are blank.
pub fn build_grid(month: TargetMonth, book: &LedgerBook) -> LedgerGrid {
    let days_in_month = month.days_in_month();

    let mut columns = Vec::with_capacity(days_in_month as usize + 5);
    columns.push(NAME_HEADER.to_string());
    columns.extend((1..=days_in_month).map(|day| day.to_string()));
    columns.extend(
        [OVERTIME_HEADER, LEAVE_HEADER, NET_HOURS_HEADER, NET_DAYS_HEADER].map(str::to_string),
    );

    let rows = book
        .ledgers()
        .iter()
        .map(|ledger| build_row(ledger, days_in_month))
        .collect();

    LedgerGrid {
        month,
        days_in_month,
        columns,
        rows,
    }
}

fn build_row(ledger: &PersonLedger, days_in_month: u32) -> LedgerRow {
    let days = (1..=days_in_month)
        .map(|day| {
            let hours = ledger.day_deltas.get(day);
            if hours.is_zero() {
                GridCell::Blank
            } else {
                GridCell::Hours(format_number(hours))
            }
        })
        .collect();

    LedgerRow {
        person_name: ledger.person_name.clone(),
        days,
        overtime_hours: format_number(ledger.overtime_hours_total),
        leave_hours: format_number(ledger.leave_hours_total),
        net_hours: format_number(ledger.net_hours_total),
        net_days: format_number(ledger.net_days_total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample_book() -> LedgerBook {
        let mut book = LedgerBook::new();
        let ledger = book.entry("张三");
        ledger.day_deltas.set(2, dec("2.25"));
        ledger.day_deltas.set(4, dec("-4"));
        ledger.day_deltas.set(5, Decimal::ZERO);
        ledger.overtime_hours_total = dec("2.25");
        ledger.leave_hours_total = dec("-4");
        ledger.net_hours_total = dec("-1.75");
        ledger.net_days_total = Decimal::ZERO;
        book.entry("李四");
        book
    }

    #[test]
    fn test_columns_for_leap_february() {
        let grid = build_grid(TargetMonth::new(2024, 2).unwrap(), &LedgerBook::new());
        assert_eq!(grid.columns.len(), 1 + 29 + 4);
        assert_eq!(grid.columns[0], "姓名");
        assert_eq!(grid.columns[1], "1");
        assert_eq!(grid.columns[29], "29");
        assert_eq!(grid.columns[30], "加班时长");
        assert_eq!(grid.columns[33], "总时长(天)");
        assert!(grid.rows.is_empty());
    }

    #[test]
    fn test_rows_render_days_and_totals() {
        let grid = build_grid(TargetMonth::new(2024, 3).unwrap(), &sample_book());
        assert_eq!(grid.rows.len(), 2);

        let row = &grid.rows[0];
        assert_eq!(row.person_name, "张三");
        assert_eq!(row.days.len(), 31);
        assert_eq!(row.days[0], GridCell::Blank);
        assert_eq!(row.days[1], GridCell::Hours(dec("2.3")));
        assert_eq!(row.days[3], GridCell::Hours(dec("-4")));
        assert_eq!(row.days[4], GridCell::Blank);
        assert_eq!(row.overtime_hours, dec("2.3"));
        assert_eq!(row.leave_hours, dec("-4"));
        assert_eq!(row.net_hours, dec("-1.8"));
        assert_eq!(row.net_days, Decimal::ZERO);
    }

    #[test]
    fn test_person_without_values_has_blank_days_and_zero_totals() {
        let grid = build_grid(TargetMonth::new(2024, 3).unwrap(), &sample_book());
        let row = &grid.rows[1];
        assert!(row.days.iter().all(|d| *d == GridCell::Blank));
        assert_eq!(row.net_hours, Decimal::ZERO);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(dec("0")), Decimal::ZERO);
        assert_eq!(format_number(dec("12.0")).to_string(), "12");
        assert_eq!(format_number(dec("1.04")).to_string(), "1");
        assert_eq!(format_number(dec("1.05")).to_string(), "1.1");
        assert_eq!(format_number(dec("-0.5")).to_string(), "-0.5");
    }
}
