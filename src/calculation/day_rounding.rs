//! Hours to days conversion.
//!
//! Net hours are reported in whole and half days. Full working days count as
//! one day each; the remainder becomes half a day when it is exactly half a
//! working day and a full day when it exceeds that. Anything below half a
//! day in total is dropped.

use rust_decimal::Decimal;

use super::duration::{HALF_DAY_HOURS, HOURS_PER_DAY};

const HALF: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Converts a signed hour total into signed days.
///
/// Negative totals are rounded by magnitude and negated, so
/// `round_days(-h) == -round_days(h)`.
///
/// # Example
///
/// ```
/// use attendance_ledger::calculation::round_days;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s| Decimal::from_str(s).unwrap();
/// assert_eq!(round_days(dec("3.9")), dec("0"));
/// assert_eq!(round_days(dec("4")), dec("0.5"));
/// assert_eq!(round_days(dec("4.1")), dec("1"));
/// assert_eq!(round_days(dec("12")), dec("1.5"));
/// assert_eq!(round_days(dec("-12.1")), dec("-2"));
/// ```
pub fn round_days(hours: Decimal) -> Decimal {
    let magnitude = hours.abs();

    let days = if magnitude < HALF_DAY_HOURS {
        Decimal::ZERO
    } else if magnitude == HALF_DAY_HOURS {
        HALF
    } else {
        let whole_days = (magnitude / HOURS_PER_DAY).floor();
        let remainder = magnitude % HOURS_PER_DAY;
        let extra = if remainder > HALF_DAY_HOURS {
            Decimal::ONE
        } else if remainder == HALF_DAY_HOURS {
            HALF
        } else {
            Decimal::ZERO
        };
        whole_days + extra
    };

    if hours.is_sign_negative() && !days.is_zero() {
        -days
    } else {
        days
    }
}
