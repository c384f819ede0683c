//! Workday calendars.
//!
//! Leave is only deducted on days attendance is expected. The
//! [`WorkdayCalendar`] trait answers that question; [`StatutoryCalendar`]
//! answers it from configured holiday arrangements and [`WeekendCalendar`]
//! applies the plain Monday to Friday rule.

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use tracing::debug;

use crate::config::CalendarConfig;

/// Decides whether a date is a working day.
pub trait WorkdayCalendar {
    /// Returns true if attendance is expected on `date`.
    fn is_workday(&self, date: NaiveDate) -> bool;
}

impl<C: WorkdayCalendar + ?Sized> WorkdayCalendar for &C {
    fn is_workday(&self, date: NaiveDate) -> bool {
        (**self).is_workday(date)
    }
}

/// Returns true for Saturday and Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Monday to Friday are workdays; nothing else is.
///
/// # Example
///
/// ```
/// use attendance_ledger::calendar::{WeekendCalendar, WorkdayCalendar};
/// use chrono::NaiveDate;
///
/// // 2024-03-09 is a Saturday
/// let saturday = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
/// assert!(!WeekendCalendar.is_workday(saturday));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendCalendar;

impl WorkdayCalendar for WeekendCalendar {
    fn is_workday(&self, date: NaiveDate) -> bool {
        !is_weekend(date)
    }
}

#[derive(Debug, Clone, Default)]
struct YearTable {
    holidays: HashSet<NaiveDate>,
    adjusted_workdays: HashSet<NaiveDate>,
}

/// The departures from the weekend rule in one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearArrangement {
    /// Calendar year.
    pub year: i32,
    /// Weekdays that are days off, in date order.
    pub holidays: Vec<NaiveDate>,
    /// Saturdays and Sundays that are worked, in date order.
    pub workdays_on_weekends: Vec<NaiveDate>,
}

/// A calendar with statutory holidays and adjusted workdays per year.
///
/// Years without a configured table fall back to the weekend rule.
#[derive(Debug, Clone, Default)]
pub struct StatutoryCalendar {
    years: HashMap<i32, YearTable>,
}

impl StatutoryCalendar {
    /// Creates a calendar with no configured years.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a calendar from loaded configuration.
    pub fn from_config(config: &CalendarConfig) -> Self {
        let mut calendar = Self::new();
        for year in config.years() {
            calendar.add_year(year.year, &year.holidays, &year.adjusted_workdays);
        }
        calendar
    }

    /// Adds (or extends) the table for `year`.
    pub fn add_year(&mut self, year: i32, holidays: &[NaiveDate], adjusted_workdays: &[NaiveDate]) {
        let table = self.years.entry(year).or_default();
        table.holidays.extend(holidays.iter().copied());
        table.adjusted_workdays.extend(adjusted_workdays.iter().copied());
    }

    /// Returns true if `year` has a configured table.
    pub fn covers(&self, year: i32) -> bool {
        self.years.contains_key(&year)
    }

    /// Lists the days of `year` whose status differs from the weekend rule.
    ///
    /// Configured holidays that fall on a weekend are not listed. Years
    /// without a table have no arrangement.
    pub fn arrangement(&self, year: i32) -> YearArrangement {
        let mut arrangement = YearArrangement {
            year,
            holidays: Vec::new(),
            workdays_on_weekends: Vec::new(),
        };
        let (Some(_), Some(first)) = (self.years.get(&year), NaiveDate::from_ymd_opt(year, 1, 1))
        else {
            return arrangement;
        };

        for date in first.iter_days().take_while(|date| date.year() == year) {
            match (is_weekend(date), self.is_workday(date)) {
                (false, false) => arrangement.holidays.push(date),
                (true, true) => arrangement.workdays_on_weekends.push(date),
                _ => {}
            }
        }
        arrangement
    }
}

impl WorkdayCalendar for StatutoryCalendar {
    fn is_workday(&self, date: NaiveDate) -> bool {
        match self.years.get(&date.year()) {
            Some(table) => {
                if table.adjusted_workdays.contains(&date) {
                    true
                } else if table.holidays.contains(&date) {
                    false
                } else {
                    !is_weekend(date)
                }
            }
            None => {
                debug!(date = %date, "No holiday table for year, using weekend rule");
                !is_weekend(date)
            }
        }
    }
}
