//! Batch storage.
//!
//! The reconciliation and merge paths read batches through the
//! [`BatchStore`] trait. [`InMemoryBatchStore`] keeps uploads in a map and can
//! drop a batch's data while keeping its id registered, which is how a
//! vanished backing file shows up.

use std::collections::HashMap;

use serde::Serialize;

use crate::calculation::classify_columns;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Batch, BatchId, BatchType, Cell, RecordKind};

/// Number of rows shown in an upload preview.
pub const PREVIEW_ROWS: usize = 10;

/// Largest page size accepted by [`paginate`].
pub const MAX_PAGE_SIZE: usize = 100;

/// Read access to uploaded batches.
pub trait BatchStore {
    /// Resolves a batch id.
    ///
    /// # Errors
    ///
    /// [`LedgerError::UnknownBatch`] if the id was never stored or has been
    /// removed, [`LedgerError::BatchDataMissing`] if the id is known but its
    /// data is gone.
    fn get_batch(&self, id: &BatchId) -> LedgerResult<&Batch>;
}

/// A [`BatchStore`] held in memory.
///
/// # Example
///
/// ```
/// use attendance_ledger::models::{Batch, BatchType, RecordTable};
/// use attendance_ledger::store::{BatchStore, InMemoryBatchStore};
///
/// let mut store = InMemoryBatchStore::new();
/// let id = store.insert(Batch::new("leave.xlsx", BatchType::Leave, RecordTable::default()));
/// assert_eq!(store.get_batch(&id).unwrap().name, "leave.xlsx");
///
/// store.purge_data(&id);
/// assert!(store.get_batch(&id).is_err());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryBatchStore {
    // None: id registered, data gone
    batches: HashMap<BatchId, Option<Batch>>,
}

impl InMemoryBatchStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a batch and returns its id.
    pub fn insert(&mut self, batch: Batch) -> BatchId {
        let id = batch.id;
        self.batches.insert(id, Some(batch));
        id
    }

    /// Forgets a batch entirely. Returns true if the id was known.
    pub fn remove(&mut self, id: &BatchId) -> bool {
        self.batches.remove(id).is_some()
    }

    /// Drops a batch's data but keeps the id registered.
    pub fn purge_data(&mut self, id: &BatchId) -> bool {
        match self.batches.get_mut(id) {
            Some(slot) => {
                *slot = None;
                true
            }
            None => false,
        }
    }

    /// Number of registered ids.
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}

impl BatchStore for InMemoryBatchStore {
    fn get_batch(&self, id: &BatchId) -> LedgerResult<&Batch> {
        match self.batches.get(id) {
            Some(Some(batch)) => Ok(batch),
            Some(None) => Err(LedgerError::BatchDataMissing {
                batch_id: id.to_string(),
            }),
            None => Err(LedgerError::UnknownBatch {
                batch_id: id.to_string(),
            }),
        }
    }
}

/// What an uploader sees right after storing a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchPreview {
    /// The stored id.
    pub batch_id: BatchId,
    /// File name.
    pub name: String,
    /// Type declared at upload.
    pub declared_type: BatchType,
    /// Type inferred from the columns.
    pub detected_kind: RecordKind,
    /// Column headers.
    pub columns: Vec<String>,
    /// The first [`PREVIEW_ROWS`] rows.
    pub rows: Vec<Vec<Cell>>,
    /// Total number of rows.
    pub total_rows: usize,
}

/// One page of a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchPage {
    /// The batch id.
    pub batch_id: BatchId,
    /// Column headers.
    pub columns: Vec<String>,
    /// Rows on this page.
    pub rows: Vec<Vec<Cell>>,
    /// Total number of rows in the batch.
    pub total_rows: usize,
    /// 1-based page number.
    pub page: usize,
    /// Page size.
    pub size: usize,
    /// Number of pages.
    pub total_pages: usize,
}

/// Builds the upload preview of a batch.
pub fn preview(batch: &Batch) -> BatchPreview {
    BatchPreview {
        batch_id: batch.id,
        name: batch.name.clone(),
        declared_type: batch.declared_type,
        detected_kind: classify_columns(batch.table.columns()),
        columns: batch.table.columns().to_vec(),
        rows: batch.table.slice(0, PREVIEW_ROWS).rows().to_vec(),
        total_rows: batch.table.len(),
    }
}

/// Returns page `page` (1-based) of `size` rows.
///
/// # Errors
///
/// [`LedgerError::InvalidPageSize`] if `size` is not in `1..=MAX_PAGE_SIZE`;
/// [`LedgerError::InvalidPage`] if `page` is zero or past the last page. An
/// empty batch has no pages.
pub fn paginate(batch: &Batch, page: usize, size: usize) -> LedgerResult<BatchPage> {
    if !(1..=MAX_PAGE_SIZE).contains(&size) {
        return Err(LedgerError::InvalidPageSize {
            size,
            max: MAX_PAGE_SIZE,
        });
    }

    let total_rows = batch.table.len();
    let total_pages = total_rows.div_ceil(size);
    if page < 1 || page > total_pages {
        return Err(LedgerError::InvalidPage { page, total_pages });
    }

    let start = (page - 1) * size;
    let slice = batch.table.slice(start, start + size);

    Ok(BatchPage {
        batch_id: batch.id,
        columns: slice.columns().to_vec(),
        rows: slice.rows().to_vec(),
        total_rows,
        page,
        size,
        total_pages,
    })
}
