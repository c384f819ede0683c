//! Target-month inference.

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{LedgerError, LedgerResult};
use crate::models::TargetMonth;

/// Picks the most frequent (year, month) among `dates`.
///
/// Ties go to the month that was seen first.
///
/// # Errors
///
/// Returns [`LedgerError::EmptyInput`] when `dates` is empty.
///
/// # Example
///
/// ```
/// use attendance_ledger::calculation::infer_target_month;
/// use attendance_ledger::models::TargetMonth;
/// use chrono::NaiveDate;
///
/// let dates = [(2024, 3, 2), (2024, 3, 15), (2024, 4, 1)]
///     .map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap());
/// assert_eq!(infer_target_month(dates).unwrap(), TargetMonth::new(2024, 3).unwrap());
/// ```
pub fn infer_target_month<I>(dates: I) -> LedgerResult<TargetMonth>
where
    I: IntoIterator<Item = NaiveDate>,
{
    // (month, count) in first-seen order
    let mut counts: Vec<(TargetMonth, usize)> = Vec::new();
    for date in dates {
        let month = TargetMonth::of(date);
        match counts.iter_mut().find(|(m, _)| *m == month) {
            Some((_, count)) => *count += 1,
            None => counts.push((month, 1)),
        }
    }

    let mut best: Option<(TargetMonth, usize)> = None;
    for &(month, count) in &counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((month, count));
        }
    }

    let (month, count) = best.ok_or_else(|| LedgerError::EmptyInput {
        message: "no parsable start time in any batch".to_string(),
    })?;
    debug!(target_month = %month, records = count, candidates = counts.len(), "Inferred target month");
    Ok(month)
}
