//! Leave span expansion.
//!
//! A leave request is turned into per-day deductions for the target month.
//! Short requests land on their start date; anything longer than a working
//! day books a full day on every workday of the span.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::calendar::WorkdayCalendar;
use crate::models::{LeaveRecord, TargetMonth};

use super::duration::HOURS_PER_DAY;

/// Hours of leave to deduct on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayAllocation {
    /// The date the leave is booked on.
    pub date: NaiveDate,
    /// Hours to deduct (positive).
    pub hours: Decimal,
}

/// Expands a leave request into per-day allocations within `month`.
///
/// - Up to [`HOURS_PER_DAY`] hours: the whole duration on the start date,
///   if that date is in `month` and is a workday.
/// - Longer: [`HOURS_PER_DAY`] hours on every date from start to end
///   (inclusive) that is in `month` and is a workday.
///
/// Either case may yield nothing. The duration is not checked against the
/// number of days in the span.
///
/// # Example
///
/// ```
/// use attendance_ledger::calculation::expand_leave;
/// use attendance_ledger::calendar::WeekendCalendar;
/// use attendance_ledger::models::{LeaveRecord, TargetMonth};
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
///
/// let at = |s| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
/// let leave = LeaveRecord {
///     creator_name: "张三".to_string(),
///     leave_type: None,
///     // Friday to Monday
///     start_time: at("2024-03-08 09:00:00"),
///     end_time: at("2024-03-11 18:00:00"),
///     duration_hours: Decimal::from(16),
///     reason: None,
///     record_id: None,
/// };
/// let month = TargetMonth::new(2024, 3).unwrap();
/// let allocations = expand_leave(&leave, month, &WeekendCalendar);
/// assert_eq!(allocations.len(), 2);
/// ```
pub fn expand_leave<C>(leave: &LeaveRecord, month: TargetMonth, calendar: &C) -> Vec<DayAllocation>
where
    C: WorkdayCalendar + ?Sized,
{
    let books = |date: NaiveDate| month.contains(date) && calendar.is_workday(date);

    if leave.duration_hours <= HOURS_PER_DAY {
        let date = leave.start_date();
        return if books(date) {
            vec![DayAllocation {
                date,
                hours: leave.duration_hours,
            }]
        } else {
            Vec::new()
        };
    }

    leave
        .start_date()
        .iter_days()
        .take_while(|date| *date <= leave.end_date())
        .filter(|date| books(*date))
        .map(|date| DayAllocation {
            date,
            hours: HOURS_PER_DAY,
        })
        .collect()
}
