//! Cell and table models for uploaded spreadsheet data.
//!
//! An uploaded batch arrives as a rectangular grid of cells with a header row.
//! Cells keep the loose typing of a spreadsheet: a value is either empty, free
//! text, or a number.

use std::borrow::Cow;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single spreadsheet cell.
///
/// Deserializes from JSON `null`, a string, or a number.
///
/// # Example
///
/// ```
/// use attendance_ledger::models::Cell;
///
/// let cells: Vec<Cell> = serde_json::from_str(r#"[null, "8小时", 8]"#).unwrap();
/// assert!(cells[0].is_empty());
/// assert_eq!(cells[1].text().as_deref(), Some("8小时"));
/// assert_eq!(cells[2].text().as_deref(), Some("8"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// No value.
    #[default]
    Empty,
    /// Free text, kept exactly as uploaded.
    Text(String),
    /// A numeric value (durations, Excel date serials).
    Number(Decimal),
}

impl Cell {
    /// Returns true if the cell holds no value or only whitespace.
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Returns the trimmed textual form of the cell, or `None` when empty.
    pub fn text(&self) -> Option<Cow<'_, str>> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then_some(Cow::Borrowed(trimmed))
            }
            Cell::Number(n) => Some(Cow::Owned(n.normalize().to_string())),
        }
    }

    /// The comparison key used when deduplicating rows.
    ///
    /// Empty cells and whitespace-only text compare equal; surrounding
    /// whitespace is ignored.
    pub fn key(&self) -> String {
        self.text().map(Cow::into_owned).unwrap_or_default()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{}", n.normalize()),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<Decimal> for Cell {
    fn from(value: Decimal) -> Self {
        Cell::Number(value)
    }
}

/// A rectangular table with named columns.
///
/// Every row has exactly as many cells as there are columns; short rows are
/// padded with [`Cell::Empty`] and long rows are truncated on construction.
///
/// # Example
///
/// ```
/// use attendance_ledger::models::{Cell, RecordTable};
///
/// let table = RecordTable::new(
///     vec!["创建人".to_string(), "时长".to_string()],
///     vec![vec![Cell::from("张三")]],
/// );
/// assert_eq!(table.len(), 1);
/// assert!(table.cell(0, "时长").unwrap().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordTable {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl RecordTable {
    /// Creates a table, normalizing every row to the header width.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Creates a table from a raw grid whose first row is the header.
    ///
    /// Header cells are trimmed; an empty grid yields an empty table.
    pub fn from_grid(mut grid: Vec<Vec<Cell>>) -> Self {
        if grid.is_empty() {
            return Self::default();
        }
        let header = grid.remove(0);
        let columns = header.iter().map(|c| c.key()).collect();
        Self::new(columns, grid)
    }

    /// The column names, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows, in upload order.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns true if a column with this exact name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Position of the named column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// The cell at `row` in the named column.
    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let index = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(index))
    }

    /// The first non-empty cell among `columns` for the given row.
    pub fn first_present(&self, row: usize, columns: &[&str]) -> Option<&Cell> {
        columns
            .iter()
            .filter_map(|column| self.cell(row, column))
            .find(|cell| !cell.is_empty())
    }

    /// Returns a copy of the table restricted to `columns`, in that order.
    ///
    /// Columns that do not exist are filled with empty cells.
    pub fn project(&self, columns: &[String]) -> RecordTable {
        let indices: Vec<Option<usize>> =
            columns.iter().map(|c| self.column_index(c)).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                indices
                    .iter()
                    .map(|i| i.and_then(|i| row.get(i)).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();
        RecordTable {
            columns: columns.to_vec(),
            rows,
        }
    }

    /// Appends `other` below this table.
    ///
    /// The resulting header is the union of both headers in first-seen order;
    /// cells for columns a table lacks are empty.
    pub fn append(&mut self, other: &RecordTable) {
        for column in &other.columns {
            if !self.columns.contains(column) {
                self.columns.push(column.clone());
            }
        }
        let width = self.columns.len();
        for row in &mut self.rows {
            row.resize(width, Cell::Empty);
        }
        let indices: Vec<Option<usize>> = self
            .columns
            .iter()
            .map(|c| other.column_index(c))
            .collect();
        for row in &other.rows {
            self.rows.push(
                indices
                    .iter()
                    .map(|i| i.and_then(|i| row.get(i)).cloned().unwrap_or_default())
                    .collect(),
            );
        }
    }

    /// Removes rows in which every cell is empty.
    pub fn drop_empty_rows(&mut self) {
        self.rows.retain(|row| !row.iter().all(Cell::is_empty));
    }

    /// Keeps only rows for which `keep` returns true, preserving order.
    pub fn retain_rows<F>(&mut self, mut keep: F)
    where
        F: FnMut(&[Cell]) -> bool,
    {
        self.rows.retain(|row| keep(row));
    }

    /// Returns a table holding the rows in `start..end`.
    pub fn slice(&self, start: usize, end: usize) -> RecordTable {
        let end = end.min(self.rows.len());
        let start = start.min(end);
        RecordTable {
            columns: self.columns.clone(),
            rows: self.rows[start..end].to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn text(s: &str) -> Cell {
        Cell::from(s)
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cell_deserializes_null_text_and_number() {
        let cells: Vec<Cell> = serde_json::from_str(r#"[null, "abc", 4.5]"#).unwrap();
        assert_eq!(cells[0], Cell::Empty);
        assert_eq!(cells[1], text("abc"));
        assert_eq!(cells[2], Cell::Number(Decimal::from_str("4.5").unwrap()));
    }

    #[test]
    fn test_whitespace_text_is_empty() {
        assert!(text("   ").is_empty());
        assert_eq!(text("  x ").text().as_deref(), Some("x"));
        assert_eq!(text(" ").key(), Cell::Empty.key());
    }

    #[test]
    fn test_number_text_is_normalized() {
        let cell = Cell::Number(Decimal::from_str("8.00").unwrap());
        assert_eq!(cell.text().as_deref(), Some("8"));
    }

    #[test]
    fn test_new_pads_short_rows() {
        let table = RecordTable::new(cols(&["a", "b", "c"]), vec![vec![text("1")]]);
        assert_eq!(table.rows()[0].len(), 3);
        assert_eq!(table.cell(0, "c"), Some(&Cell::Empty));
    }

    #[test]
    fn test_from_grid_uses_first_row_as_header() {
        let table = RecordTable::from_grid(vec![
            vec![text(" 创建人 "), text("时长")],
            vec![text("张三"), text("8小时")],
        ]);
        assert_eq!(table.columns(), &cols(&["创建人", "时长"])[..]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.cell(0, "创建人"), Some(&text("张三")));
    }

    #[test]
    fn test_from_empty_grid() {
        let table = RecordTable::from_grid(vec![]);
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
    }

    #[test]
    fn test_first_present_skips_empty_columns() {
        let table = RecordTable::new(
            cols(&["加班人", "姓名"]),
            vec![vec![Cell::Empty, text("李四")]],
        );
        assert_eq!(
            table.first_present(0, &["加班人", "姓名"]),
            Some(&text("李四"))
        );
        assert_eq!(table.first_present(0, &["加班人"]), None);
    }

    #[test]
    fn test_append_unions_columns() {
        let mut first = RecordTable::new(cols(&["a", "b"]), vec![vec![text("1"), text("2")]]);
        let second = RecordTable::new(cols(&["b", "c"]), vec![vec![text("3"), text("4")]]);
        first.append(&second);

        assert_eq!(first.columns(), &cols(&["a", "b", "c"])[..]);
        assert_eq!(first.rows()[0], vec![text("1"), text("2"), Cell::Empty]);
        assert_eq!(first.rows()[1], vec![Cell::Empty, text("3"), text("4")]);
    }

    #[test]
    fn test_project_reorders_and_fills() {
        let table = RecordTable::new(cols(&["a", "b"]), vec![vec![text("1"), text("2")]]);
        let projected = table.project(&cols(&["b", "z"]));
        assert_eq!(projected.rows()[0], vec![text("2"), Cell::Empty]);
    }

    #[test]
    fn test_drop_empty_rows() {
        let mut table = RecordTable::new(
            cols(&["a", "b"]),
            vec![
                vec![Cell::Empty, text("  ")],
                vec![text("x"), Cell::Empty],
            ],
        );
        table.drop_empty_rows();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_slice_clamps_bounds() {
        let table = RecordTable::new(
            cols(&["a"]),
            vec![vec![text("1")], vec![text("2")], vec![text("3")]],
        );
        assert_eq!(table.slice(1, 10).len(), 2);
        assert_eq!(table.slice(5, 10).len(), 0);
    }
}
