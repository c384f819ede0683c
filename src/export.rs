//! Tabular export.
//!
//! Results leave the engine as an [`ExportTable`]: a header, optional title,
//! per-column hints and display-ready cells. A [`TabularExporter`] turns the
//! table into file bytes; [`CsvExporter`] is the bundled implementation.

use chrono::NaiveDate;
use rust_decimal::RoundingStrategy;
use serde::Serialize;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Cell, GridCell, LedgerGrid, RecordTable};

/// How numbers in a column should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberFormat {
    /// Values as they are.
    General,
    /// Whole numbers.
    Integer,
    /// One decimal place.
    OneDecimal,
}

/// A column header plus rendering hints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportColumn {
    /// Header text.
    pub name: String,
    /// Highlighted column (the ledger's summary columns).
    pub marked: bool,
    /// Number rendering hint.
    pub format: NumberFormat,
}

impl ExportColumn {
    /// A plain, unmarked column.
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            marked: false,
            format: NumberFormat::General,
        }
    }
}

/// A table ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportTable {
    /// Sheet title, written above the header when present.
    pub title: Option<String>,
    /// Columns.
    pub columns: Vec<ExportColumn>,
    /// Rows, each as wide as `columns`.
    pub rows: Vec<Vec<Cell>>,
}

impl ExportTable {
    /// Lays out a ledger grid for export.
    ///
    /// The four summary columns are marked. Numeric columns get
    /// [`NumberFormat::OneDecimal`] if any value in them has a fraction and
    /// [`NumberFormat::Integer`] otherwise.
    pub fn from_grid(grid: &LedgerGrid) -> Self {
        let rows: Vec<Vec<Cell>> = grid
            .rows
            .iter()
            .map(|row| {
                let mut cells = Vec::with_capacity(grid.columns.len());
                cells.push(Cell::Text(row.person_name.clone()));
                cells.extend(row.days.iter().map(|day| match day {
                    GridCell::Blank => Cell::Empty,
                    GridCell::Hours(hours) => Cell::Number(*hours),
                }));
                cells.extend(
                    [row.overtime_hours, row.leave_hours, row.net_hours, row.net_days]
                        .map(Cell::Number),
                );
                cells
            })
            .collect();

        let summary = grid.summary_columns();
        let columns = grid
            .columns
            .iter()
            .enumerate()
            .map(|(index, name)| ExportColumn {
                name: name.clone(),
                marked: summary.contains(&index),
                format: if index == 0 {
                    NumberFormat::General
                } else {
                    column_format(&rows, index)
                },
            })
            .collect();

        Self {
            title: Some(grid.title()),
            columns,
            rows,
        }
    }

    /// Exports a record table as-is, without a title.
    pub fn from_records(table: &RecordTable) -> Self {
        Self {
            title: None,
            columns: table
                .columns()
                .iter()
                .map(|c| ExportColumn::plain(c.clone()))
                .collect(),
            rows: table.rows().to_vec(),
        }
    }
}

fn column_format(rows: &[Vec<Cell>], index: usize) -> NumberFormat {
    let has_fraction = rows.iter().any(|row| match row.get(index) {
        Some(Cell::Number(n)) => !n.fract().is_zero(),
        _ => false,
    });
    if has_fraction {
        NumberFormat::OneDecimal
    } else {
        NumberFormat::Integer
    }
}

/// Serializes an [`ExportTable`] into a file format.
pub trait TabularExporter {
    /// File extension without the dot.
    fn extension(&self) -> &'static str;

    /// MIME type of the produced bytes.
    fn content_type(&self) -> &'static str;

    /// Writes the table.
    fn export(&self, table: &ExportTable) -> LedgerResult<Vec<u8>>;
}

/// Writes tables as UTF-8 CSV.
///
/// # Example
///
/// ```
/// use attendance_ledger::export::{CsvExporter, ExportColumn, ExportTable, TabularExporter};
/// use attendance_ledger::models::Cell;
///
/// let table = ExportTable {
///     title: None,
///     columns: vec![ExportColumn::plain("创建人")],
///     rows: vec![vec![Cell::from("张三")]],
/// };
/// let bytes = CsvExporter::default().export(&table).unwrap();
/// assert_eq!(String::from_utf8(bytes).unwrap(), "创建人\n张三\n");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter {
    /// Prefix output with a UTF-8 byte order mark so spreadsheet tools detect
    /// the encoding.
    pub byte_order_mark: bool,
}

impl CsvExporter {
    /// An exporter that writes a byte order mark.
    pub fn with_byte_order_mark() -> Self {
        Self {
            byte_order_mark: true,
        }
    }
}

impl TabularExporter for CsvExporter {
    fn extension(&self) -> &'static str {
        "csv"
    }

    fn content_type(&self) -> &'static str {
        "text/csv; charset=utf-8"
    }

    fn export(&self, table: &ExportTable) -> LedgerResult<Vec<u8>> {
        let mut buffer = Vec::new();
        if self.byte_order_mark {
            buffer.extend_from_slice("\u{feff}".as_bytes());
        }

        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(buffer);

        if let Some(title) = &table.title {
            writer.write_record([title.as_str()]).map_err(csv_error)?;
        }
        writer
            .write_record(table.columns.iter().map(|c| c.name.as_str()))
            .map_err(csv_error)?;

        for row in &table.rows {
            let record: Vec<String> = row
                .iter()
                .zip(&table.columns)
                .map(|(cell, column)| render(cell, column.format))
                .collect();
            writer.write_record(&record).map_err(csv_error)?;
        }

        writer.into_inner().map_err(|e| LedgerError::Export {
            message: e.to_string(),
        })
    }
}

fn csv_error(error: csv::Error) -> LedgerError {
    LedgerError::Export {
        message: error.to_string(),
    }
}

fn render(cell: &Cell, format: NumberFormat) -> String {
    match (cell, format) {
        (Cell::Number(n), NumberFormat::OneDecimal) => format!(
            "{:.1}",
            n.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        ),
        (Cell::Number(n), NumberFormat::Integer) => n.trunc().normalize().to_string(),
        _ => cell.to_string(),
    }
}

/// An exported file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Suggested download name, e.g. `20240401合并请假记录.csv`.
    pub file_name: String,
    /// MIME type.
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Exports `table` and names the file `{YYYYMMDD}{label}.{ext}`.
    pub fn build<E>(
        exporter: &E,
        table: &ExportTable,
        label: &str,
        date: NaiveDate,
    ) -> LedgerResult<Self>
    where
        E: TabularExporter + ?Sized,
    {
        let bytes = exporter.export(table)?;
        Ok(Self {
            file_name: format!(
                "{}{}.{}",
                date.format("%Y%m%d"),
                label,
                exporter.extension()
            ),
            content_type: exporter.content_type().to_string(),
            bytes,
        })
    }
}
