//! Ledger reconciliation.
//!
//! Resolves the requested batches, infers the month to reconcile, folds every
//! parsable row into person ledgers and lays the result out as a grid.

use std::time::Instant;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use crate::calendar::WorkdayCalendar;
use crate::error::{LedgerError, LedgerResult, RowError};
use crate::export::{ExportArtifact, ExportTable, TabularExporter};
use crate::models::{Batch, BatchId, LedgerBook, LedgerGrid, RowDiagnostic, TargetMonth};
use crate::store::BatchStore;

use super::accumulator::LedgerAccumulator;
use super::classification::{classify_columns, extract_record, row_start_time};
use super::grid_builder::build_grid;
use super::target_month::infer_target_month;

/// File label used when exporting a ledger.
pub const LEDGER_EXPORT_LABEL: &str = "考勤记录";

/// The outcome of a reconciliation.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerReport {
    /// The month that was reconciled.
    pub month: TargetMonth,
    /// Person ledgers in first-appearance order.
    pub book: LedgerBook,
    /// The ledger as a grid.
    pub grid: LedgerGrid,
    /// Rows that were skipped, in processing order.
    pub diagnostics: Vec<RowDiagnostic>,
}

/// Resolves `batch_ids` through `store` and reconciles them.
///
/// Every id must resolve before any data is read.
///
/// # Errors
///
/// - [`LedgerError::EmptyInput`] if `batch_ids` is empty or no row has a
///   parsable start time.
/// - [`LedgerError::UnknownBatch`] / [`LedgerError::BatchDataMissing`] from
///   the store.
pub fn build_ledger<S, C>(
    store: &S,
    batch_ids: &[BatchId],
    calendar: &C,
) -> LedgerResult<LedgerReport>
where
    S: BatchStore + ?Sized,
    C: WorkdayCalendar + ?Sized,
{
    let batches = batch_ids
        .iter()
        .map(|id| store.get_batch(id))
        .collect::<LedgerResult<Vec<&Batch>>>()?;
    reconcile(&batches, calendar)
}

/// Reconciles already-resolved batches, in the order given.
pub fn reconcile<C>(batches: &[&Batch], calendar: &C) -> LedgerResult<LedgerReport>
where
    C: WorkdayCalendar + ?Sized,
{
    if batches.is_empty() {
        return Err(LedgerError::EmptyInput {
            message: "no batches selected".to_string(),
        });
    }

    let started = Instant::now();
    let kinds: Vec<_> = batches
        .iter()
        .map(|batch| classify_columns(batch.table.columns()))
        .collect();

    let start_dates = batches.iter().flat_map(|batch| {
        (0..batch.table.len())
            .filter_map(|row| row_start_time(&batch.table, row))
            .map(|start| start.date())
    });
    let month = infer_target_month(start_dates)?;

    let mut accumulator = LedgerAccumulator::new(month);
    let mut diagnostics = Vec::new();
    let mut folded = 0usize;

    for (batch, &kind) in batches.iter().zip(&kinds) {
        for row in 0..batch.table.len() {
            let outcome = extract_record(&batch.table, row, kind).and_then(|record| match record {
                Some(record) => accumulator.fold(&record, calendar).map(|()| true),
                None => Ok(false),
            });
            match outcome {
                Ok(true) => folded += 1,
                Ok(false) => {}
                Err(error) => diagnostics.push(diagnose(batch, row, &error)),
            }
        }
    }

    let book = accumulator.finish();
    let grid = build_grid(month, &book);

    info!(
        target_month = %month,
        batches = batches.len(),
        records = folded,
        skipped = diagnostics.len(),
        persons = book.len(),
        duration_us = started.elapsed().as_micros(),
        "Ledger reconciled"
    );

    Ok(LedgerReport {
        month,
        book,
        grid,
        diagnostics,
    })
}

/// Reconciles `batch_ids` and exports the grid as `{YYYYMMDD}考勤记录`.
pub fn export_ledger<S, C, E>(
    store: &S,
    batch_ids: &[BatchId],
    calendar: &C,
    exporter: &E,
    today: NaiveDate,
) -> LedgerResult<ExportArtifact>
where
    S: BatchStore + ?Sized,
    C: WorkdayCalendar + ?Sized,
    E: TabularExporter + ?Sized,
{
    let report = build_ledger(store, batch_ids, calendar)?;
    ExportArtifact::build(
        exporter,
        &ExportTable::from_grid(&report.grid),
        LEDGER_EXPORT_LABEL,
        today,
    )
}

fn diagnose(batch: &Batch, row: usize, error: &RowError) -> RowDiagnostic {
    warn!(
        batch_id = %batch.id,
        batch = %batch.name,
        row,
        reason = %error,
        "Skipping row"
    );
    RowDiagnostic {
        batch_id: batch.id,
        batch_name: batch.name.clone(),
        row,
        reason: error.to_string(),
    }
}
