//! Calculation logic for the attendance ledger engine.
//!
//! This module contains the row-level parsers (durations, timestamps and
//! column classification), target-month inference, leave span expansion,
//! the per-person accumulation and day rounding that make up a ledger, the
//! grid layout of a finished ledger, leave batch merging and the plain
//! record exports.

mod accumulator;
mod classification;
mod day_rounding;
mod duration;
mod grid_builder;
mod merge;
mod reconcile;
mod record_export;
mod span_expansion;
mod target_month;
mod timestamp;

pub use accumulator::LedgerAccumulator;
pub use classification::{
    DURATION_COLUMN, END_TIME_COLUMN, ID_COLUMNS, LEAVE_CREATOR_COLUMN, LEAVE_HOURS_COLUMN,
    LEAVE_REASON_COLUMN, LEAVE_TYPE_COLUMN, NAME_COLUMN, OVERTIME_HOURS_COLUMN,
    OVERTIME_PERSON_COLUMN, OVERTIME_REASON_COLUMN, START_TIME_COLUMN, classify_columns,
    extract_record, row_start_time,
};
pub use day_rounding::round_days;
pub use duration::{HALF_DAY_HOURS, HOURS_PER_DAY, parse_duration_hours};
pub use grid_builder::{build_grid, format_number};
pub use merge::{
    LEAVE_PROJECTION, MERGED_LEAVE_EXPORT_LABEL, export_merged_leave, merge_leave_batches,
    merge_tables,
};
pub use reconcile::{LEDGER_EXPORT_LABEL, LedgerReport, build_ledger, export_ledger, reconcile};
pub use record_export::{
    OVERTIME_PROJECTION, collect_records, export_records, record_export_label, record_projection,
};
pub use span_expansion::{DayAllocation, expand_leave};
pub use target_month::infer_target_month;
pub use timestamp::{excel_serial_to_datetime, parse_timestamp};
