//! Batch classification and record extraction.
//!
//! A batch is classified once, from its column names, and every row is then
//! parsed as that kind of record. The declared upload type is not consulted.

use tracing::debug;

use crate::error::RowError;
use crate::models::{AttendanceRecord, Cell, LeaveRecord, OvertimeRecord, RecordKind, RecordTable};

use super::duration::parse_duration_hours;
use super::timestamp::parse_timestamp;

/// Overtime person column (加班人).
pub const OVERTIME_PERSON_COLUMN: &str = "加班人";
/// Overtime hours column (加班时长).
pub const OVERTIME_HOURS_COLUMN: &str = "加班时长";
/// Leave creator column (创建人).
pub const LEAVE_CREATOR_COLUMN: &str = "创建人";
/// Leave hours column (请假时长).
pub const LEAVE_HOURS_COLUMN: &str = "请假时长";
/// Leave type column (请假类型).
pub const LEAVE_TYPE_COLUMN: &str = "请假类型";
/// Generic person name column (姓名).
pub const NAME_COLUMN: &str = "姓名";
/// Start time column (开始时间).
pub const START_TIME_COLUMN: &str = "开始时间";
/// End time column (结束时间).
pub const END_TIME_COLUMN: &str = "结束时间";
/// Duration column (时长).
pub const DURATION_COLUMN: &str = "时长";
/// Overtime reason column (加班原因).
pub const OVERTIME_REASON_COLUMN: &str = "加班原因";
/// Leave reason column (请假事由).
pub const LEAVE_REASON_COLUMN: &str = "请假事由";
/// Record identifier columns, highest priority first.
pub const ID_COLUMNS: [&str; 3] = ["数据ID", "id", "ID"];

const OVERTIME_MARKERS: [&str; 2] = [OVERTIME_PERSON_COLUMN, OVERTIME_HOURS_COLUMN];
const LEAVE_MARKERS: [&str; 3] = [LEAVE_CREATOR_COLUMN, LEAVE_HOURS_COLUMN, LEAVE_TYPE_COLUMN];

/// Classifies a table by its characteristic column names.
///
/// Overtime markers win over leave markers when both are present.
///
/// # Example
///
/// ```
/// use attendance_ledger::calculation::classify_columns;
/// use attendance_ledger::models::RecordKind;
///
/// let columns = vec!["创建人".to_string(), "开始时间".to_string()];
/// assert_eq!(classify_columns(&columns), RecordKind::Leave);
/// assert_eq!(classify_columns(&[]), RecordKind::Unknown);
/// ```
pub fn classify_columns(columns: &[String]) -> RecordKind {
    let has_any = |markers: &[&str]| columns.iter().any(|c| markers.contains(&c.as_str()));

    let kind = if has_any(&OVERTIME_MARKERS) {
        RecordKind::Overtime
    } else if has_any(&LEAVE_MARKERS) {
        RecordKind::Leave
    } else {
        RecordKind::Unknown
    };
    debug!(?kind, columns = columns.len(), "Classified batch");
    kind
}

/// Parses row `row` of `table` as a record of `kind`.
///
/// Returns `Ok(None)` for [`RecordKind::Unknown`].
pub fn extract_record(
    table: &RecordTable,
    row: usize,
    kind: RecordKind,
) -> Result<Option<AttendanceRecord>, RowError> {
    match kind {
        RecordKind::Overtime => {
            extract_overtime(table, row).map(|r| Some(AttendanceRecord::Overtime(r)))
        }
        RecordKind::Leave => extract_leave(table, row).map(|r| Some(AttendanceRecord::Leave(r))),
        RecordKind::Unknown => Ok(None),
    }
}

/// The parsed start time of a row, if it has one.
///
/// Used for target-month inference, which looks at every batch regardless of
/// its classification.
pub fn row_start_time(table: &RecordTable, row: usize) -> Option<chrono::NaiveDateTime> {
    let cell = table.cell(row, START_TIME_COLUMN)?;
    parse_timestamp(cell, START_TIME_COLUMN).ok()
}

fn extract_overtime(table: &RecordTable, row: usize) -> Result<OvertimeRecord, RowError> {
    let person_name = person(table, row, OVERTIME_PERSON_COLUMN)?;
    let start_time = parse_timestamp(required(table, row, START_TIME_COLUMN), START_TIME_COLUMN)?;
    let duration_hours = parse_duration_hours(duration_cell(table, row, OVERTIME_HOURS_COLUMN))?;

    Ok(OvertimeRecord {
        person_name,
        start_time,
        duration_hours,
        reason: optional_text(table, row, &[OVERTIME_REASON_COLUMN]),
    })
}

fn extract_leave(table: &RecordTable, row: usize) -> Result<LeaveRecord, RowError> {
    let creator_name = person(table, row, LEAVE_CREATOR_COLUMN)?;
    let duration_hours = parse_duration_hours(duration_cell(table, row, LEAVE_HOURS_COLUMN))?;
    let start_time = parse_timestamp(required(table, row, START_TIME_COLUMN), START_TIME_COLUMN)?;
    let end_time = parse_timestamp(required(table, row, END_TIME_COLUMN), END_TIME_COLUMN)?;

    Ok(LeaveRecord {
        creator_name,
        leave_type: optional_text(table, row, &[LEAVE_TYPE_COLUMN]),
        start_time,
        end_time,
        duration_hours,
        reason: optional_text(table, row, &[LEAVE_REASON_COLUMN]),
        record_id: optional_text(table, row, &ID_COLUMNS),
    })
}

fn person(table: &RecordTable, row: usize, primary: &str) -> Result<String, RowError> {
    table
        .first_present(row, &[primary, NAME_COLUMN])
        .and_then(Cell::text)
        .map(|name| name.into_owned())
        .ok_or(RowError::MissingPerson)
}

fn required<'a>(table: &'a RecordTable, row: usize, column: &str) -> &'a Cell {
    const EMPTY: &Cell = &Cell::Empty;
    table.cell(row, column).unwrap_or(EMPTY)
}

// 时长 first, then the family-specific hours column
fn duration_cell<'a>(table: &'a RecordTable, row: usize, fallback: &str) -> &'a Cell {
    table
        .first_present(row, &[DURATION_COLUMN, fallback])
        .unwrap_or_else(|| required(table, row, DURATION_COLUMN))
}

fn optional_text(table: &RecordTable, row: usize, columns: &[&str]) -> Option<String> {
    table
        .first_present(row, columns)
        .and_then(Cell::text)
        .map(|text| text.into_owned())
}
