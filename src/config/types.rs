//! Configuration types for the workday calendar.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use chrono::NaiveDate;
use serde::Deserialize;

/// Metadata about the jurisdiction a calendar describes.
#[derive(Debug, Clone, Deserialize)]
pub struct JurisdictionMetadata {
    /// Short jurisdiction code (e.g., "CN").
    pub code: String,
    /// The human-readable name of the calendar.
    pub name: String,
    /// Where the holiday arrangements are published.
    pub source_url: String,
}

/// Holiday arrangement for a single year.
///
/// `holidays` are days off even if they fall Monday to Friday.
/// `adjusted_workdays` are weekend days on which work is required.
#[derive(Debug, Clone, Deserialize)]
pub struct YearCalendarConfig {
    /// The year these dates belong to.
    pub year: i32,
    /// Statutory days off.
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,
    /// Weekend days moved into the working week.
    #[serde(default)]
    pub adjusted_workdays: Vec<NaiveDate>,
}

/// The complete calendar configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct CalendarConfig {
    metadata: JurisdictionMetadata,
    /// Year tables, sorted oldest first.
    years: Vec<YearCalendarConfig>,
}

impl CalendarConfig {
    /// Creates a CalendarConfig from its component parts.
    pub fn new(metadata: JurisdictionMetadata, years: Vec<YearCalendarConfig>) -> Self {
        let mut sorted_years = years;
        sorted_years.sort_by_key(|y| y.year);
        Self {
            metadata,
            years: sorted_years,
        }
    }

    /// Returns the jurisdiction metadata.
    pub fn jurisdiction(&self) -> &JurisdictionMetadata {
        &self.metadata
    }

    /// Returns all configured years.
    pub fn years(&self) -> &[YearCalendarConfig] {
        &self.years
    }
}
