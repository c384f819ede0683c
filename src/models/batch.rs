//! Uploaded batch model.
//!
//! A batch is one uploaded spreadsheet: a table plus the type the uploader
//! declared for it.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::RecordTable;

/// Identifier assigned to a batch when it is stored.
pub type BatchId = Uuid;

/// The record type an uploader declared for a batch.
///
/// # Example
///
/// ```
/// use attendance_ledger::models::BatchType;
///
/// let parsed: BatchType = serde_json::from_str("\"leave\"").unwrap();
/// assert_eq!(parsed, BatchType::Leave);
/// assert_eq!(parsed.to_string(), "leave");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchType {
    /// Overtime records (加班记录).
    Overtime,
    /// Leave records (请假记录).
    Leave,
}

impl fmt::Display for BatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchType::Overtime => write!(f, "overtime"),
            BatchType::Leave => write!(f, "leave"),
        }
    }
}

/// An uploaded table of attendance records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    /// Store-assigned identifier.
    pub id: BatchId,
    /// Original file name, kept for diagnostics.
    pub name: String,
    /// The type declared at upload time.
    pub declared_type: BatchType,
    /// The uploaded rows.
    pub table: RecordTable,
}

impl Batch {
    /// Creates a batch with a fresh id.
    pub fn new(name: impl Into<String>, declared_type: BatchType, table: RecordTable) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            declared_type,
            table,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_batches_get_distinct_ids() {
        let a = Batch::new("a.xlsx", BatchType::Leave, RecordTable::default());
        let b = Batch::new("a.xlsx", BatchType::Leave, RecordTable::default());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_batch_type_serialization() {
        assert_eq!(
            serde_json::to_string(&BatchType::Overtime).unwrap(),
            "\"overtime\""
        );
        let parsed: BatchType = serde_json::from_str("\"leave\"").unwrap();
        assert_eq!(parsed, BatchType::Leave);
    }
}
