//! Request types for the attendance ledger API.
//!
//! This module defines the JSON request bodies and query strings accepted by
//! the batch, ledger, merge and export endpoints.

use serde::{Deserialize, Serialize};

use crate::models::{Batch, BatchId, BatchType, Cell, RecordTable};

/// Request body for `POST /batches`.
///
/// The table is sent either as `columns` plus `rows`, or as `rows` alone
/// with the header in the first row (the shape of a sheet read cell by cell).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadBatchRequest {
    /// Original file name.
    pub name: String,
    /// The type the uploader declares for the batch.
    pub batch_type: BatchType,
    /// Column headers, when not carried in the first row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    /// Table rows.
    #[serde(default)]
    pub rows: Vec<Vec<Cell>>,
}

impl UploadBatchRequest {
    /// Builds the table described by the request.
    ///
    /// Returns `None` when the request carries no header at all.
    pub fn into_batch(self) -> Option<Batch> {
        let table = match self.columns {
            Some(columns) if !columns.is_empty() => RecordTable::new(columns, self.rows),
            Some(_) => return None,
            None if self.rows.is_empty() => return None,
            None => RecordTable::from_grid(self.rows),
        };
        Some(Batch::new(self.name, self.batch_type, table))
    }
}

/// Request body naming the batches an operation should read, in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchIdsRequest {
    /// Batch ids in processing order.
    pub batch_ids: Vec<BatchId>,
}

/// Query string for `GET /batches/:id`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageQuery {
    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: usize,
    /// Rows per page.
    #[serde(default = "default_size")]
    pub size: usize,
}

/// Query string for `GET /holidays`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HolidayQuery {
    /// Calendar year.
    pub year: i32,
}

fn default_page() -> usize {
    1
}

fn default_size() -> usize {
    10
}
