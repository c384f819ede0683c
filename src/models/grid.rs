//! Rectangular ledger and merged-leave outputs.
//!
//! These are the shapes handed to a tabular exporter: every value is already
//! rounded for display.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Cell, RecordTable, TargetMonth};

/// Header of the person-name column.
pub const NAME_HEADER: &str = "姓名";
/// Header of the overtime total column.
pub const OVERTIME_HEADER: &str = "加班时长";
/// Header of the signed leave total column.
pub const LEAVE_HEADER: &str = "调/请假";
/// Header of the net hours column.
pub const NET_HOURS_HEADER: &str = "总时长";
/// Header of the net days column.
pub const NET_DAYS_HEADER: &str = "总时长(天)";

/// A day cell as rendered in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GridCell {
    /// Nothing to show for this day.
    Blank,
    /// A display-rounded hour amount.
    Hours(Decimal),
}

impl GridCell {
    /// The numeric value, if any.
    pub fn value(&self) -> Option<Decimal> {
        match self {
            GridCell::Blank => None,
            GridCell::Hours(h) => Some(*h),
        }
    }
}

/// One person's row in the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    /// The person.
    pub person_name: String,
    /// One cell per day of the month, day 1 first.
    pub days: Vec<GridCell>,
    /// Overtime hours total.
    pub overtime_hours: Decimal,
    /// Leave hours total (negative).
    pub leave_hours: Decimal,
    /// Net hours.
    pub net_hours: Decimal,
    /// Net days after day rounding.
    pub net_days: Decimal,
}

/// The finished ledger laid out as a table.
///
/// Columns are `姓名`, `1..=days_in_month`, then the four summary columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerGrid {
    /// The reconciled month.
    pub month: TargetMonth,
    /// Number of day columns.
    pub days_in_month: u32,
    /// Column headers.
    pub columns: Vec<String>,
    /// One row per person, in first-appearance order.
    pub rows: Vec<LedgerRow>,
}

impl LedgerGrid {
    /// The sheet title, e.g. `2024年3月加班统计表（小时）`.
    pub fn title(&self) -> String {
        format!(
            "{}年{}月加班统计表（小时）",
            self.month.year, self.month.month
        )
    }

    /// Positions of the four summary columns.
    pub fn summary_columns(&self) -> std::ops::Range<usize> {
        let first = self.days_in_month as usize + 1;
        first..first + 4
    }
}

/// Which key the merger used to decide row equivalence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", content = "columns", rename_all = "snake_case")]
pub enum DedupKey {
    /// A single identifier column.
    Identifier(String),
    /// Creator / start / end, restricted to those present.
    CreatorSpan(Vec<String>),
    /// Every projected column.
    FullRow(Vec<String>),
}

impl DedupKey {
    /// The key columns.
    pub fn columns(&self) -> Vec<String> {
        match self {
            DedupKey::Identifier(column) => vec![column.clone()],
            DedupKey::CreatorSpan(columns) | DedupKey::FullRow(columns) => columns.clone(),
        }
    }
}

/// Row counts reported by a merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSummary {
    /// Non-empty rows after concatenation.
    pub rows_before: usize,
    /// Rows left after deduplication.
    pub rows_after: usize,
    /// `rows_before - rows_after`.
    pub rows_removed: usize,
    /// The key used.
    pub key: DedupKey,
}

/// The canonical leave table produced by a merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedLeaveTable {
    /// Projected, deduplicated rows in zero-based contiguous order.
    pub table: RecordTable,
    /// Counts and key.
    pub summary: MergeSummary,
}

impl MergedLeaveTable {
    /// Column headers.
    pub fn columns(&self) -> &[String] {
        self.table.columns()
    }

    /// Rows in order.
    pub fn rows(&self) -> &[Vec<Cell>] {
        self.table.rows()
    }
}
