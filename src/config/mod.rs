//! Configuration loading for the attendance ledger engine.
//!
//! This module loads the workday calendar from YAML files: jurisdiction
//! metadata plus one holiday arrangement per year.
//!
//! # Example
//!
//! ```no_run
//! use attendance_ledger::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/cn").unwrap();
//! println!("Loaded calendar: {}", config.jurisdiction().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{CalendarConfig, JurisdictionMetadata, YearCalendarConfig};
