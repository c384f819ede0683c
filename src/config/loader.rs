//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the workday
//! calendar from YAML files.

use std::fs;
use std::path::Path;

use crate::calendar::StatutoryCalendar;
use crate::error::{LedgerError, LedgerResult};

use super::types::{CalendarConfig, JurisdictionMetadata, YearCalendarConfig};

/// Loads and provides access to calendar configuration.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/cn/
/// ├── calendar.yaml    # Jurisdiction metadata
/// └── years/
///     └── 2024.yaml    # Holidays and adjusted workdays for 2024
/// ```
///
/// # Example
///
/// ```no_run
/// use attendance_ledger::calendar::WorkdayCalendar;
/// use attendance_ledger::config::ConfigLoader;
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/cn").unwrap();
/// let calendar = loader.calendar();
///
/// // National Day
/// let date = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
/// assert!(!calendar.is_workday(date));
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: CalendarConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if `calendar.yaml` is missing, the `years` directory
    /// is missing or holds no `.yaml` files, or any file contains invalid YAML.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use attendance_ledger::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/cn")?;
    /// # Ok::<(), attendance_ledger::error::LedgerError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> LedgerResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<JurisdictionMetadata>(&path.join("calendar.yaml"))?;
        let years = Self::load_years(&path.join("years"))?;

        Ok(Self {
            config: CalendarConfig::new(metadata, years),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> LedgerResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| LedgerError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| LedgerError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads all year files from the years directory.
    fn load_years(years_dir: &Path) -> LedgerResult<Vec<YearCalendarConfig>> {
        let years_dir_str = years_dir.display().to_string();

        let entries = fs::read_dir(years_dir).map_err(|_| LedgerError::ConfigNotFound {
            path: years_dir_str.clone(),
        })?;

        let mut years = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| LedgerError::ConfigNotFound {
                path: years_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                years.push(Self::load_yaml::<YearCalendarConfig>(&path)?);
            }
        }

        if years.is_empty() {
            return Err(LedgerError::ConfigNotFound {
                path: format!("{} (no year files found)", years_dir_str),
            });
        }

        Ok(years)
    }

    /// Returns the underlying calendar configuration.
    pub fn config(&self) -> &CalendarConfig {
        &self.config
    }

    /// Returns the jurisdiction metadata.
    pub fn jurisdiction(&self) -> &JurisdictionMetadata {
        self.config.jurisdiction()
    }

    /// Builds the workday calendar described by this configuration.
    pub fn calendar(&self) -> StatutoryCalendar {
        StatutoryCalendar::from_config(&self.config)
    }
}
