//! Person ledger accumulation.
//!
//! Records are folded in batch order then row order. Per-day cells keep the
//! last value written; the running totals add up every record. Day totals
//! are derived once, when the accumulator is finished.

use chrono::Datelike;
use rust_decimal::Decimal;
use tracing::debug;

use crate::calendar::WorkdayCalendar;
use crate::error::RowError;
use crate::models::{AttendanceRecord, LedgerBook, LeaveRecord, OvertimeRecord, TargetMonth};

use super::day_rounding::round_days;
use super::span_expansion::expand_leave;

/// Folds attendance records into a [`LedgerBook`] for one target month.
///
/// # Example
///
/// ```
/// use attendance_ledger::calculation::LedgerAccumulator;
/// use attendance_ledger::calendar::WeekendCalendar;
/// use attendance_ledger::models::{AttendanceRecord, OvertimeRecord, TargetMonth};
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
///
/// let mut accumulator = LedgerAccumulator::new(TargetMonth::new(2024, 3).unwrap());
/// let record = AttendanceRecord::Overtime(OvertimeRecord {
///     person_name: "李四".to_string(),
///     start_time: NaiveDateTime::parse_from_str("2024-03-02 19:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
///     duration_hours: Decimal::from(12),
///     reason: None,
/// });
/// accumulator.fold(&record, &WeekendCalendar).unwrap();
///
/// let book = accumulator.finish();
/// assert_eq!(book.get("李四").unwrap().net_days_total, Decimal::new(15, 1));
/// ```
#[derive(Debug, Clone)]
pub struct LedgerAccumulator {
    month: TargetMonth,
    book: LedgerBook,
}

impl LedgerAccumulator {
    /// Creates an empty accumulator for `month`.
    pub fn new(month: TargetMonth) -> Self {
        Self {
            month,
            book: LedgerBook::new(),
        }
    }

    /// The month being accumulated.
    pub fn month(&self) -> TargetMonth {
        self.month
    }

    /// Folds one record into the book.
    ///
    /// Overtime counts towards the totals whatever its date; only overtime
    /// inside the target month writes a day cell. A record that would
    /// overflow a running total is rejected with
    /// [`RowError::HoursOverflow`] and leaves the book untouched.
    pub fn fold<C>(&mut self, record: &AttendanceRecord, calendar: &C) -> Result<(), RowError>
    where
        C: WorkdayCalendar + ?Sized,
    {
        match record {
            AttendanceRecord::Overtime(overtime) => self.fold_overtime(overtime),
            AttendanceRecord::Leave(leave) => self.fold_leave(leave, calendar),
        }
    }

    fn fold_overtime(&mut self, record: &OvertimeRecord) -> Result<(), RowError> {
        let hours = record.duration_hours;
        let (overtime_total, net_total) = match self.book.get(&record.person_name) {
            Some(ledger) => (
                checked_total(ledger.overtime_hours_total, hours)?,
                checked_total(ledger.net_hours_total, hours)?,
            ),
            None => (hours, hours),
        };

        let date = record.start_date();
        let ledger = self.book.entry(&record.person_name);
        if self.month.contains(date) {
            ledger.day_deltas.set(date.day(), hours);
        } else {
            debug!(
                person = %record.person_name,
                date = %date,
                month = %self.month,
                "Overtime outside target month counted in totals only"
            );
        }
        ledger.overtime_hours_total = overtime_total;
        ledger.net_hours_total = net_total;
        Ok(())
    }

    fn fold_leave<C>(&mut self, record: &LeaveRecord, calendar: &C) -> Result<(), RowError>
    where
        C: WorkdayCalendar + ?Sized,
    {
        let allocations = expand_leave(record, self.month, calendar);
        let (mut leave_total, mut net_total) = self
            .book
            .get(&record.creator_name)
            .map(|ledger| (ledger.leave_hours_total, ledger.net_hours_total))
            .unwrap_or_default();
        for allocation in &allocations {
            leave_total = checked_total(leave_total, -allocation.hours)?;
            net_total = checked_total(net_total, -allocation.hours)?;
        }

        let ledger = self.book.entry(&record.creator_name);
        for allocation in allocations {
            ledger.day_deltas.set(allocation.date.day(), -allocation.hours);
        }
        ledger.leave_hours_total = leave_total;
        ledger.net_hours_total = net_total;
        Ok(())
    }

    /// Derives day totals and returns the finished book.
    pub fn finish(mut self) -> LedgerBook {
        for ledger in self.book.ledgers_mut() {
            ledger.net_days_total = round_days(ledger.net_hours_total);
        }
        self.book
    }
}

fn checked_total(total: Decimal, hours: Decimal) -> Result<Decimal, RowError> {
    total
        .checked_add(hours)
        .ok_or(RowError::HoursOverflow { hours })
}
