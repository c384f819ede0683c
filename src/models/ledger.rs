//! Ledger models: the reconciled month, per-person ledgers and diagnostics.

use std::collections::HashMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::BatchId;

/// Largest day-of-month of any calendar month.
pub const MAX_DAYS_IN_MONTH: usize = 31;

/// The (year, month) a ledger is reconciled for.
///
/// # Example
///
/// ```
/// use attendance_ledger::models::TargetMonth;
/// use chrono::NaiveDate;
///
/// let month = TargetMonth::new(2024, 2).unwrap();
/// assert_eq!(month.days_in_month(), 29);
/// assert!(month.contains(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
/// assert_eq!(month.to_string(), "2024-02");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetMonth {
    /// Calendar year.
    pub year: i32,
    /// Month, 1 through 12.
    pub month: u32,
}

impl TargetMonth {
    /// Creates a target month, or `None` if `month` is not 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// First day of the month.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Number of days in the month (28 to 31).
    pub fn days_in_month(&self) -> u32 {
        let first = self.first_day();
        let next = first
            .checked_add_months(chrono::Months::new(1))
            .unwrap_or(first);
        u32::try_from((next - first).num_days()).unwrap_or(0)
    }

    /// Returns true if `date` falls within this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for TargetMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Signed hour amounts per day of month.
///
/// Each slot is either unrecorded or holds the last value written to it.
/// Reading an unrecorded day yields zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayDeltas {
    cells: [Option<Decimal>; MAX_DAYS_IN_MONTH],
}

impl DayDeltas {
    /// The amount recorded for `day` (1-based), zero if none.
    pub fn get(&self, day: u32) -> Decimal {
        self.slot(day).and_then(|c| *c).unwrap_or(Decimal::ZERO)
    }

    /// Returns true if any record has written to `day`.
    pub fn is_recorded(&self, day: u32) -> bool {
        self.slot(day).is_some_and(Option::is_some)
    }

    /// Overwrites the amount for `day`. Days outside 1..=31 are ignored.
    pub fn set(&mut self, day: u32, hours: Decimal) {
        if let Some(slot) = day
            .checked_sub(1)
            .and_then(|i| self.cells.get_mut(i as usize))
        {
            *slot = Some(hours);
        }
    }

    /// Recorded days and their amounts, in day order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, Decimal)> + '_ {
        self.cells
            .iter()
            .zip(1u32..)
            .filter_map(|(cell, day)| cell.map(|hours| (day, hours)))
    }

    fn slot(&self, day: u32) -> Option<&Option<Decimal>> {
        day.checked_sub(1).and_then(|i| self.cells.get(i as usize))
    }
}

/// Accumulated attendance for one person over the target month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonLedger {
    /// Name exactly as it appeared in the records.
    pub person_name: String,
    /// Per-day signed hours (positive overtime, negative leave).
    pub day_deltas: DayDeltas,
    /// Sum of all overtime hours folded in.
    pub overtime_hours_total: Decimal,
    /// Sum of all leave hours folded in, stored as a negative number.
    pub leave_hours_total: Decimal,
    /// `overtime_hours_total + leave_hours_total`.
    pub net_hours_total: Decimal,
    /// Net total in day units, derived once after folding.
    pub net_days_total: Decimal,
}

impl PersonLedger {
    /// Creates an all-zero ledger.
    pub fn new(person_name: impl Into<String>) -> Self {
        Self {
            person_name: person_name.into(),
            day_deltas: DayDeltas::default(),
            overtime_hours_total: Decimal::ZERO,
            leave_hours_total: Decimal::ZERO,
            net_hours_total: Decimal::ZERO,
            net_days_total: Decimal::ZERO,
        }
    }
}

/// All person ledgers of one reconciliation, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LedgerBook {
    ledgers: Vec<PersonLedger>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl LedgerBook {
    /// Creates an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the ledger for `name`, creating it on first encounter.
    pub fn entry(&mut self, name: &str) -> &mut PersonLedger {
        let position = match self.index.get(name) {
            Some(&position) => position,
            None => {
                self.ledgers.push(PersonLedger::new(name));
                let position = self.ledgers.len() - 1;
                self.index.insert(name.to_string(), position);
                position
            }
        };
        &mut self.ledgers[position]
    }

    /// Looks up a ledger by person name.
    pub fn get(&self, name: &str) -> Option<&PersonLedger> {
        self.index.get(name).and_then(|&i| self.ledgers.get(i))
    }

    /// All ledgers in first-appearance order.
    pub fn ledgers(&self) -> &[PersonLedger] {
        &self.ledgers
    }

    /// Mutable access to all ledgers, in first-appearance order.
    pub fn ledgers_mut(&mut self) -> impl Iterator<Item = &mut PersonLedger> {
        self.ledgers.iter_mut()
    }

    /// Number of people in the book.
    pub fn len(&self) -> usize {
        self.ledgers.len()
    }

    /// Returns true if no person has been recorded.
    pub fn is_empty(&self) -> bool {
        self.ledgers.is_empty()
    }
}

/// A row that was skipped while building a ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowDiagnostic {
    /// The batch the row came from.
    pub batch_id: BatchId,
    /// The batch's file name.
    pub batch_name: String,
    /// Zero-based row index within the batch.
    pub row: usize,
    /// Why the row was skipped.
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_target_month_rejects_invalid_month() {
        assert!(TargetMonth::new(2024, 13).is_none());
        assert!(TargetMonth::new(2024, 0).is_none());
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(TargetMonth::new(2024, 1).unwrap().days_in_month(), 31);
        assert_eq!(TargetMonth::new(2023, 2).unwrap().days_in_month(), 28);
        assert_eq!(TargetMonth::new(2024, 4).unwrap().days_in_month(), 30);
        assert_eq!(TargetMonth::new(2024, 12).unwrap().days_in_month(), 31);
    }

    #[test]
    fn test_day_deltas_distinguish_absent_from_zero() {
        let mut deltas = DayDeltas::default();
        assert!(!deltas.is_recorded(5));
        assert_eq!(deltas.get(5), Decimal::ZERO);

        deltas.set(5, Decimal::ZERO);
        assert!(deltas.is_recorded(5));
        assert_eq!(deltas.get(5), Decimal::ZERO);
    }

    #[test]
    fn test_day_deltas_overwrite() {
        let mut deltas = DayDeltas::default();
        deltas.set(12, dec("8"));
        deltas.set(12, dec("-4"));
        assert_eq!(deltas.get(12), dec("-4"));
        assert_eq!(deltas.iter().collect::<Vec<_>>(), vec![(12, dec("-4"))]);
    }

    #[test]
    fn test_day_deltas_ignore_out_of_range_days() {
        let mut deltas = DayDeltas::default();
        deltas.set(0, dec("1"));
        deltas.set(32, dec("1"));
        assert_eq!(deltas.iter().count(), 0);
        assert!(!deltas.is_recorded(0));
    }

    #[test]
    fn test_ledger_book_keeps_first_appearance_order() {
        let mut book = LedgerBook::new();
        book.entry("王五");
        book.entry("张三");
        book.entry("王五").overtime_hours_total = dec("2");

        let names: Vec<&str> = book
            .ledgers()
            .iter()
            .map(|l| l.person_name.as_str())
            .collect();
        assert_eq!(names, vec!["王五", "张三"]);
        assert_eq!(book.get("王五").unwrap().overtime_hours_total, dec("2"));
        assert_eq!(book.len(), 2);
    }
}
