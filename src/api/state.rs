//! Application state for the attendance ledger API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::calendar::StatutoryCalendar;
use crate::export::CsvExporter;
use crate::store::InMemoryBatchStore;

/// Shared application state.
///
/// Holds the uploaded batches, the workday calendar loaded from
/// configuration and the exporter used for downloads.
#[derive(Clone)]
pub struct AppState {
    store: Arc<RwLock<InMemoryBatchStore>>,
    calendar: Arc<StatutoryCalendar>,
    exporter: CsvExporter,
}

impl AppState {
    /// Creates a new application state with an empty store.
    pub fn new(calendar: StatutoryCalendar) -> Self {
        Self {
            store: Arc::new(RwLock::new(InMemoryBatchStore::new())),
            calendar: Arc::new(calendar),
            exporter: CsvExporter::with_byte_order_mark(),
        }
    }

    /// Returns the batch store.
    pub fn store(&self) -> &RwLock<InMemoryBatchStore> {
        &self.store
    }

    /// Returns the workday calendar.
    pub fn calendar(&self) -> &StatutoryCalendar {
        &self.calendar
    }

    /// Returns the exporter used for downloads.
    pub fn exporter(&self) -> &CsvExporter {
        &self.exporter
    }
}
