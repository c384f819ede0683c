//! Attendance record models.
//!
//! Rows of a classified batch are parsed into one of the two record variants.
//! The variant is decided once per batch from its columns ([`RecordKind`]) and
//! carried explicitly from there on.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The record family a batch was classified as from its column names.
///
/// # Example
///
/// ```
/// use attendance_ledger::models::RecordKind;
///
/// assert_eq!(format!("{:?}", RecordKind::Unknown), "Unknown");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Overtime rows (加班).
    Overtime,
    /// Leave rows (请假).
    Leave,
    /// Neither family could be recognized; contributes nothing to a ledger.
    Unknown,
}

/// A single overtime entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeRecord {
    /// The person who worked the overtime.
    pub person_name: String,
    /// When the overtime started.
    pub start_time: NaiveDateTime,
    /// Parsed duration in hours.
    pub duration_hours: Decimal,
    /// Free-text reason, if given.
    pub reason: Option<String>,
}

impl OvertimeRecord {
    /// The calendar date the overtime is booked on.
    pub fn start_date(&self) -> NaiveDate {
        self.start_time.date()
    }
}

/// A single leave request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRecord {
    /// The person who filed the leave request.
    pub creator_name: String,
    /// Leave category (年假, 事假, ...), if given.
    pub leave_type: Option<String>,
    /// First moment of the leave.
    pub start_time: NaiveDateTime,
    /// Last moment of the leave.
    pub end_time: NaiveDateTime,
    /// Parsed duration in hours.
    pub duration_hours: Decimal,
    /// Free-text reason, if given.
    pub reason: Option<String>,
    /// External correction-tracking key (数据ID), if present.
    pub record_id: Option<String>,
}

impl LeaveRecord {
    /// The first calendar date of the leave.
    pub fn start_date(&self) -> NaiveDate {
        self.start_time.date()
    }

    /// The last calendar date of the leave.
    pub fn end_date(&self) -> NaiveDate {
        self.end_time.date()
    }
}

/// A parsed attendance record of either family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttendanceRecord {
    /// An overtime entry.
    Overtime(OvertimeRecord),
    /// A leave request.
    Leave(LeaveRecord),
}

impl AttendanceRecord {
    /// The person the record is booked against.
    pub fn person_name(&self) -> &str {
        match self {
            AttendanceRecord::Overtime(r) => &r.person_name,
            AttendanceRecord::Leave(r) => &r.creator_name,
        }
    }

    /// The family of this record.
    pub fn kind(&self) -> RecordKind {
        match self {
            AttendanceRecord::Overtime(_) => RecordKind::Overtime,
            AttendanceRecord::Leave(_) => RecordKind::Leave,
        }
    }
}
