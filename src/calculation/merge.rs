//! Leave batch merging.
//!
//! Leave exports are re-uploaded across correction cycles, so the same
//! request often appears in several batches. Merging concatenates the
//! batches, projects them onto the canonical leave columns and keeps the
//! first occurrence of each request.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::info;

use crate::error::{LedgerError, LedgerResult};
use crate::export::{ExportArtifact, ExportTable, TabularExporter};
use crate::models::{
    Batch, BatchId, BatchType, Cell, DedupKey, MergeSummary, MergedLeaveTable, RecordTable,
};
use crate::store::BatchStore;

use super::classification::{
    DURATION_COLUMN, END_TIME_COLUMN, ID_COLUMNS, LEAVE_CREATOR_COLUMN, LEAVE_REASON_COLUMN,
    LEAVE_TYPE_COLUMN, START_TIME_COLUMN,
};

/// File label used when exporting a merged leave table.
pub const MERGED_LEAVE_EXPORT_LABEL: &str = "合并请假记录";

/// Canonical leave columns, in output order.
pub const LEAVE_PROJECTION: [&str; 6] = [
    LEAVE_TYPE_COLUMN,
    START_TIME_COLUMN,
    END_TIME_COLUMN,
    DURATION_COLUMN,
    LEAVE_REASON_COLUMN,
    LEAVE_CREATOR_COLUMN,
];

const SPAN_KEY: [&str; 3] = [LEAVE_CREATOR_COLUMN, START_TIME_COLUMN, END_TIME_COLUMN];

/// Merges leave batches into one deduplicated table.
///
/// All ids are resolved and type-checked before any table is read; any
/// failure aborts the merge.
///
/// # Errors
///
/// - [`LedgerError::UnknownBatch`] / [`LedgerError::BatchDataMissing`] from
///   the store.
/// - [`LedgerError::TypeMismatch`] if a batch was not uploaded as leave.
/// - [`LedgerError::EmptyInput`] if no batch has a non-empty row.
pub fn merge_leave_batches<S>(store: &S, batch_ids: &[BatchId]) -> LedgerResult<MergedLeaveTable>
where
    S: BatchStore + ?Sized,
{
    let batches = batch_ids
        .iter()
        .map(|id| {
            let batch = store.get_batch(id)?;
            if batch.declared_type != BatchType::Leave {
                return Err(LedgerError::TypeMismatch {
                    batch_id: id.to_string(),
                    expected: BatchType::Leave,
                    actual: batch.declared_type,
                });
            }
            Ok(batch)
        })
        .collect::<LedgerResult<Vec<&Batch>>>()?;

    merge_tables(batches.iter().map(|batch| &batch.table))
}

/// Merges already-resolved leave tables, in the order given.
pub fn merge_tables<'a, I>(tables: I) -> LedgerResult<MergedLeaveTable>
where
    I: IntoIterator<Item = &'a RecordTable>,
{
    let mut combined = RecordTable::default();
    let mut batch_count = 0usize;
    for table in tables {
        combined.append(table);
        batch_count += 1;
    }
    combined.drop_empty_rows();

    if combined.is_empty() {
        return Err(LedgerError::EmptyInput {
            message: "selected leave batches contain no rows".to_string(),
        });
    }
    let rows_before = combined.len();

    let mut projected = combined.project(&projection_columns(combined.columns()));
    let key = dedup_key(projected.columns());
    let key_indices: Vec<usize> = key
        .columns()
        .iter()
        .filter_map(|column| projected.column_index(column))
        .collect();

    let mut seen: HashSet<Vec<String>> = HashSet::new();
    projected.retain_rows(|row| {
        let fingerprint = key_indices
            .iter()
            .map(|&i| row.get(i).map(Cell::key).unwrap_or_default())
            .collect();
        seen.insert(fingerprint)
    });

    let rows_after = projected.len();
    info!(
        batches = batch_count,
        rows_before,
        rows_after,
        key = ?key,
        "Leave batches merged"
    );

    Ok(MergedLeaveTable {
        table: projected,
        summary: MergeSummary {
            rows_before,
            rows_after,
            rows_removed: rows_before - rows_after,
            key,
        },
    })
}

/// Merges leave batches and exports the result as `{YYYYMMDD}合并请假记录`.
pub fn export_merged_leave<S, E>(
    store: &S,
    batch_ids: &[BatchId],
    exporter: &E,
    today: NaiveDate,
) -> LedgerResult<ExportArtifact>
where
    S: BatchStore + ?Sized,
    E: TabularExporter + ?Sized,
{
    let merged = merge_leave_batches(store, batch_ids)?;
    ExportArtifact::build(
        exporter,
        &ExportTable::from_records(&merged.table),
        MERGED_LEAVE_EXPORT_LABEL,
        today,
    )
}

fn id_column(columns: &[String]) -> Option<&'static str> {
    ID_COLUMNS
        .into_iter()
        .find(|id| columns.iter().any(|c| c == id))
}

fn projection_columns(available: &[String]) -> Vec<String> {
    let mut columns: Vec<String> = LEAVE_PROJECTION
        .iter()
        .filter(|column| available.iter().any(|c| c == *column))
        .map(|column| column.to_string())
        .collect();

    if columns.is_empty() {
        return available.to_vec();
    }
    if let Some(id) = id_column(available) {
        columns.push(id.to_string());
    }
    columns
}

fn dedup_key(projected: &[String]) -> DedupKey {
    if let Some(id) = id_column(projected) {
        return DedupKey::Identifier(id.to_string());
    }

    let span: Vec<String> = SPAN_KEY
        .iter()
        .filter(|column| projected.iter().any(|c| c == *column))
        .map(|column| column.to_string())
        .collect();
    if span.is_empty() {
        DedupKey::FullRow(projected.to_vec())
    } else {
        DedupKey::CreatorSpan(span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::CsvExporter;
    use crate::store::InMemoryBatchStore;

    fn table(columns: &[&str], rows: &[&[&str]]) -> RecordTable {
        RecordTable::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| Cell::from(*c)).collect())
                .collect(),
        )
    }

    fn leave(table: RecordTable) -> Batch {
        Batch::new("leave.xlsx", BatchType::Leave, table)
    }

    const COLUMNS: [&str; 6] = ["创建人", "请假类型", "开始时间", "结束时间", "时长", "审批状态"];

    #[test]
    fn test_dedup_by_creator_and_span() {
        let a = table(
            &COLUMNS,
            &[
                &["张三", "年假", "2024-03-04", "2024-03-04", "8", "通过"],
                &["李四", "事假", "2024-03-05", "2024-03-05", "4", "通过"],
            ],
        );
        let b = table(
            &COLUMNS,
            &[
                // Same request, different type: still a duplicate
                &["张三", "调休", "2024-03-04", "2024-03-04", "8", "通过"],
                &["王五", "年假", "2024-03-06", "2024-03-06", "8", "通过"],
            ],
        );

        let merged = merge_tables([&a, &b]).unwrap();
        assert_eq!(merged.summary.rows_before, 4);
        assert_eq!(merged.summary.rows_after, 3);
        assert_eq!(merged.summary.rows_removed, 1);
        assert_eq!(
            merged.summary.key,
            DedupKey::CreatorSpan(vec![
                "创建人".to_string(),
                "开始时间".to_string(),
                "结束时间".to_string()
            ])
        );
        // Projection drops 审批状态 and uses canonical order
        assert_eq!(
            merged.columns(),
            &["请假类型", "开始时间", "结束时间", "时长", "创建人"].map(String::from)[..]
        );
        // First occurrence wins
        assert_eq!(merged.rows()[0][0], Cell::from("年假"));
    }

    #[test]
    fn test_identifier_column_wins() {
        let a = table(
            &["数据ID", "创建人", "开始时间", "结束时间"],
            &[
                &["1", "张三", "2024-03-04", "2024-03-04"],
                &["2", "张三", "2024-03-04", "2024-03-04"],
                &["1", "张三", "2024-03-05", "2024-03-05"],
            ],
        );
        let merged = merge_tables([&a]).unwrap();
        assert_eq!(merged.summary.key, DedupKey::Identifier("数据ID".to_string()));
        assert_eq!(merged.summary.rows_after, 2);
        assert_eq!(merged.columns().last().map(String::as_str), Some("数据ID"));
    }

    #[test]
    fn test_id_column_priority() {
        let a = table(
            &["ID", "id", "创建人"],
            &[&["x", "1", "张三"], &["y", "1", "李四"]],
        );
        let merged = merge_tables([&a]).unwrap();
        assert_eq!(merged.summary.key, DedupKey::Identifier("id".to_string()));
        assert_eq!(merged.summary.rows_after, 1);
    }

    #[test]
    fn test_unrecognized_columns_dedup_on_full_row() {
        let a = table(&["x", "y"], &[&["1", "2"], &["1", "2"], &["1", "3"]]);
        let merged = merge_tables([&a]).unwrap();
        assert_eq!(
            merged.summary.key,
            DedupKey::FullRow(vec!["x".to_string(), "y".to_string()])
        );
        assert_eq!(merged.summary.rows_after, 2);
    }

    #[test]
    fn test_whitespace_and_empty_cells_compare_equal() {
        let a = table(
            &["创建人", "开始时间", "结束时间"],
            &[&["张三 ", "2024-03-04", ""], &["张三", " 2024-03-04", "  "]],
        );
        assert_eq!(merge_tables([&a]).unwrap().summary.rows_after, 1);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let a = table(
            &COLUMNS,
            &[
                &["张三", "年假", "2024-03-04", "2024-03-04", "8", "通过"],
                &["张三", "年假", "2024-03-04", "2024-03-04", "8", "通过"],
                &["李四", "事假", "2024-03-05", "2024-03-05", "4", "通过"],
            ],
        );
        let once = merge_tables([&a]).unwrap();
        let twice = merge_tables([&once.table]).unwrap();
        assert_eq!(once.table, twice.table);
        assert_eq!(twice.summary.rows_removed, 0);
    }

    #[test]
    fn test_empty_rows_are_dropped_before_counting() {
        let a = table(&COLUMNS, &[&["", "", "", "", "", ""]]);
        assert!(matches!(
            merge_tables([&a]),
            Err(LedgerError::EmptyInput { .. })
        ));
    }

    #[test]
    fn test_columns_union_across_batches() {
        let a = table(&["创建人", "开始时间"], &[&["张三", "2024-03-04"]]);
        let b = table(
            &["创建人", "开始时间", "请假事由"],
            &[&["李四", "2024-03-05", "看病"]],
        );
        let merged = merge_tables([&a, &b]).unwrap();
        assert_eq!(
            merged.columns(),
            &["开始时间", "请假事由", "创建人"].map(String::from)[..]
        );
        assert_eq!(merged.rows()[0][1], Cell::Empty);
    }

    #[test]
    fn test_store_merge_rejects_wrong_type_before_reading() {
        let mut store = InMemoryBatchStore::new();
        let a = store.insert(leave(table(&COLUMNS, &[])));
        let b = store.insert(Batch::new(
            "overtime.xlsx",
            BatchType::Overtime,
            table(&["加班人"], &[&["张三"]]),
        ));

        match merge_leave_batches(&store, &[a, b]) {
            Err(LedgerError::TypeMismatch {
                expected, actual, ..
            }) => {
                assert_eq!(expected, BatchType::Leave);
                assert_eq!(actual, BatchType::Overtime);
            }
            other => panic!("Expected TypeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_store_merge_reports_missing_data() {
        let mut store = InMemoryBatchStore::new();
        let a = store.insert(leave(table(&COLUMNS, &[&["张三", "", "", "", "", ""]])));
        let b = store.insert(leave(table(&COLUMNS, &[])));
        store.purge_data(&b);

        assert!(matches!(
            merge_leave_batches(&store, &[a, b]),
            Err(LedgerError::BatchDataMissing { .. })
        ));
    }

    #[test]
    fn test_export_merged_leave() {
        let mut store = InMemoryBatchStore::new();
        let row: &[&str] = &["张三", "年假", "2024-03-04", "2024-03-04", "8", "通过"];
        let a = store.insert(leave(table(&COLUMNS, &[row])));
        let b = store.insert(leave(table(&COLUMNS, &[row])));
        let today = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();

        let artifact =
            export_merged_leave(&store, &[a, b], &CsvExporter::default(), today).unwrap();
        assert_eq!(artifact.file_name, "20240401合并请假记录.csv");
        let text = String::from_utf8(artifact.bytes).unwrap();
        assert_eq!(
            text,
            "请假类型,开始时间,结束时间,时长,创建人\n年假,2024-03-04,2024-03-04,8,张三\n"
        );
    }
}
