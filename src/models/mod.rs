//! Core data models for the attendance ledger engine.
//!
//! This module contains the table, batch, record and ledger types shared by
//! the reconciliation and merge paths.

mod batch;
mod grid;
mod ledger;
mod record;
mod table;

pub use batch::{Batch, BatchId, BatchType};
pub use grid::{
    DedupKey, GridCell, LEAVE_HEADER, LedgerGrid, LedgerRow, MergeSummary, MergedLeaveTable,
    NAME_HEADER, NET_DAYS_HEADER, NET_HOURS_HEADER, OVERTIME_HEADER,
};
pub use ledger::{
    DayDeltas, LedgerBook, MAX_DAYS_IN_MONTH, PersonLedger, RowDiagnostic, TargetMonth,
};
pub use record::{AttendanceRecord, LeaveRecord, OvertimeRecord, RecordKind};
pub use table::{Cell, RecordTable};
