//! Plain overtime and leave exports.
//!
//! Unlike the merger these exports do not deduplicate and are lenient about
//! batch ids: ids that do not resolve are skipped with a warning.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::export::{ExportArtifact, ExportTable, TabularExporter};
use crate::models::{BatchId, BatchType, RecordTable};
use crate::store::BatchStore;

use super::classification::{
    DURATION_COLUMN, END_TIME_COLUMN, OVERTIME_PERSON_COLUMN, OVERTIME_REASON_COLUMN,
    START_TIME_COLUMN,
};
use super::merge::LEAVE_PROJECTION;

/// Overtime export columns, in output order.
pub const OVERTIME_PROJECTION: [&str; 5] = [
    OVERTIME_PERSON_COLUMN,
    START_TIME_COLUMN,
    END_TIME_COLUMN,
    DURATION_COLUMN,
    OVERTIME_REASON_COLUMN,
];

/// Columns kept when exporting records of `kind`.
pub fn record_projection(kind: BatchType) -> &'static [&'static str] {
    match kind {
        BatchType::Overtime => &OVERTIME_PROJECTION,
        BatchType::Leave => &LEAVE_PROJECTION,
    }
}

/// File label for exported records of `kind`.
pub fn record_export_label(kind: BatchType) -> &'static str {
    match kind {
        BatchType::Overtime => "加班记录",
        BatchType::Leave => "请假记录",
    }
}

/// Concatenates the resolvable batches and projects them onto the
/// export columns of `kind`.
///
/// # Errors
///
/// - [`LedgerError::EmptyInput`] if no id resolves.
/// - [`LedgerError::MissingColumns`] if none of the export columns exist.
pub fn collect_records<S>(
    store: &S,
    batch_ids: &[BatchId],
    kind: BatchType,
) -> LedgerResult<RecordTable>
where
    S: BatchStore + ?Sized,
{
    let mut combined = RecordTable::default();
    let mut resolved = 0usize;

    for id in batch_ids {
        match store.get_batch(id) {
            Ok(batch) => {
                combined.append(&batch.table);
                resolved += 1;
            }
            Err(error) => {
                warn!(batch_id = %id, error = %error, "Skipping batch in record export");
            }
        }
    }

    if resolved == 0 {
        return Err(LedgerError::EmptyInput {
            message: format!("no {kind} batch could be read"),
        });
    }

    let columns: Vec<String> = record_projection(kind)
        .iter()
        .filter(|column| combined.has_column(column))
        .map(|column| column.to_string())
        .collect();

    if columns.is_empty() {
        return Err(LedgerError::MissingColumns {
            expected: record_projection(kind).join(", "),
            available: combined.columns().join(", "),
        });
    }

    info!(
        kind = %kind,
        batches = resolved,
        rows = combined.len(),
        "Records collected for export"
    );
    Ok(combined.project(&columns))
}

/// Exports plain records as `{YYYYMMDD}加班记录` or `{YYYYMMDD}请假记录`.
pub fn export_records<S, E>(
    store: &S,
    batch_ids: &[BatchId],
    kind: BatchType,
    exporter: &E,
    today: NaiveDate,
) -> LedgerResult<ExportArtifact>
where
    S: BatchStore + ?Sized,
    E: TabularExporter + ?Sized,
{
    let table = collect_records(store, batch_ids, kind)?;
    ExportArtifact::build(
        exporter,
        &ExportTable::from_records(&table),
        record_export_label(kind),
        today,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::CsvExporter;
    use crate::models::{Batch, Cell};
    use crate::store::InMemoryBatchStore;
    use uuid::Uuid;

    fn table(columns: &[&str], rows: &[&[&str]]) -> RecordTable {
        RecordTable::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| Cell::from(*c)).collect())
                .collect(),
        )
    }

    fn overtime_batch(person: &str) -> Batch {
        Batch::new(
            "ot.xlsx",
            BatchType::Overtime,
            table(
                &["加班人", "开始时间", "时长", "审批人"],
                &[&[person, "2024-03-02 10:00:00", "2", "主管"]],
            ),
        )
    }

    #[test]
    fn test_overtime_export_keeps_duplicates_and_projects() {
        let mut store = InMemoryBatchStore::new();
        let a = store.insert(overtime_batch("李四"));
        let b = store.insert(overtime_batch("李四"));

        let records = collect_records(&store, &[a, b], BatchType::Overtime).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records.columns(),
            &["加班人", "开始时间", "时长"].map(String::from)[..]
        );
    }

    #[test]
    fn test_unresolvable_ids_are_skipped() {
        let mut store = InMemoryBatchStore::new();
        let a = store.insert(overtime_batch("李四"));
        let gone = store.insert(overtime_batch("王五"));
        store.purge_data(&gone);

        let records =
            collect_records(&store, &[Uuid::new_v4(), a, gone], BatchType::Overtime)
                .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_no_resolvable_batch_is_empty_input() {
        let store = InMemoryBatchStore::new();
        assert!(matches!(
            collect_records(&store, &[Uuid::new_v4()], BatchType::Leave),
            Err(LedgerError::EmptyInput { .. })
        ));
    }

    #[test]
    fn test_missing_columns() {
        let mut store = InMemoryBatchStore::new();
        let a = store.insert(Batch::new(
            "notes.xlsx",
            BatchType::Leave,
            table(&["审批人", "备注"], &[&["主管", "已批"]]),
        ));
        match collect_records(&store, &[a], BatchType::Leave) {
            Err(LedgerError::MissingColumns { available, .. }) => {
                assert_eq!(available, "审批人, 备注");
            }
            other => panic!("Expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_leave_export_of_overtime_batch_keeps_shared_columns() {
        let mut store = InMemoryBatchStore::new();
        let a = store.insert(overtime_batch("李四"));
        let records = collect_records(&store, &[a], BatchType::Leave).unwrap();
        assert_eq!(records.columns(), &["开始时间", "时长"].map(String::from)[..]);
    }

    #[test]
    fn test_export_file_name() {
        let mut store = InMemoryBatchStore::new();
        let a = store.insert(overtime_batch("李四"));
        let today = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let artifact = export_records(
            &store,
            &[a],
            BatchType::Overtime,
            &CsvExporter::default(),
            today,
        )
        .unwrap();
        assert_eq!(artifact.file_name, "20240401加班记录.csv");
    }
}
