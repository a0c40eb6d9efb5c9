//! Table, Row, and Cell data structures

use std::borrow::Cow;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::schema::{CellType, Column};

/// Strings a decoder treats as a missing value (compared after trimming)
pub const MISSING_SENTINELS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "null", "NULL", "None", "#N/A", "<NA>",
];

/// Check whether a raw string is a missing-value marker
pub fn is_missing_sentinel(s: &str) -> bool {
    MISSING_SENTINELS.contains(&s.trim())
}

/// A cell value with type information
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            (CellValue::Int(a), CellValue::Int(b)) => a == b,
            (CellValue::Float(a), CellValue::Float(b)) => {
                // Handle NaN comparison
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (CellValue::String(a), CellValue::String(b)) => a == b,
            (CellValue::Date(a), CellValue::Date(b)) => a == b,
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a == b,
            // Cross-type numeric comparison
            (CellValue::Int(a), CellValue::Float(b)) => (*a as f64) == *b,
            (CellValue::Float(a), CellValue::Int(b)) => *a == (*b as f64),
            _ => false,
        }
    }
}

impl CellValue {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Check if the value counts as missing: null, NaN, blank or a sentinel string
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Float(f) => f.is_nan(),
            CellValue::String(s) => is_missing_sentinel(s),
            _ => false,
        }
    }

    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) if !f.is_nan() => Some(*f),
            _ => None,
        }
    }

    /// Type of this single value
    pub fn cell_type(&self) -> CellType {
        match self {
            CellValue::Null => CellType::Null,
            CellValue::Bool(_) => CellType::Bool,
            CellValue::Int(_) => CellType::Int,
            CellValue::Float(f) if f.is_nan() => CellType::Null,
            CellValue::Float(_) => CellType::Float,
            CellValue::String(_) => CellType::String,
            CellValue::Date(_) => CellType::Date,
            CellValue::DateTime(_) => CellType::DateTime,
        }
    }

    /// Convert to a display string
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed("NULL"),
            other => other.to_field(),
        }
    }

    /// Text form used when writing the value to a delimited file.
    ///
    /// Missing values become an empty field.
    pub fn to_field(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed(""),
            CellValue::Bool(b) => Cow::Owned(b.to_string()),
            CellValue::Int(i) => Cow::Owned(i.to_string()),
            CellValue::Float(f) if f.is_nan() => Cow::Borrowed(""),
            CellValue::Float(f) => Cow::Owned(f.to_string()),
            CellValue::String(s) => Cow::Borrowed(s.as_str()),
            CellValue::Date(d) => Cow::Owned(d.to_string()),
            CellValue::DateTime(dt) => Cow::Owned(dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// A row in the table
#[derive(Debug, Clone)]
pub struct Row {
    /// Cell values in column order
    pub cells: Vec<CellValue>,
    /// Original line/row number in source file (1-indexed)
    pub source_line: usize,
}

impl Row {
    pub fn new(cells: Vec<CellValue>, source_line: usize) -> Self {
        Self { cells, source_line }
    }

    /// Get a cell value by column index
    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }
}

/// A table containing columns and rows.
///
/// Every row holds exactly one cell per column.
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// Column definitions
    pub columns: Vec<Column>,
    /// All rows in the table
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a new empty table with column definitions
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from column names and row-major cells, inferring types
    pub fn from_rows<S: Into<String>>(names: Vec<S>, rows: Vec<Vec<CellValue>>) -> Self {
        let columns = names.into_iter().map(Column::new).collect();
        let mut table = Table::new(columns);
        for (i, cells) in rows.into_iter().enumerate() {
            table.add_row(cells, i + 2);
        }
        table.infer_column_types();
        table
    }

    /// Add a row to the table
    pub fn add_row(&mut self, cells: Vec<CellValue>, source_line: usize) {
        debug_assert_eq!(cells.len(), self.columns.len(), "row width must match columns");
        self.rows.push(Row::new(cells, source_line));
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Get column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in table order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Iterate over the cells of one column
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Copy of the first `n` rows
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// New table holding the given column indices, in the order given
    pub fn select_indices(&self, indices: &[usize]) -> Table {
        let columns = indices
            .iter()
            .filter_map(|&i| self.columns.get(i).cloned())
            .collect();

        let rows = self
            .rows
            .iter()
            .map(|row| {
                let cells = indices
                    .iter()
                    .map(|&i| row.get(i).cloned().unwrap_or(CellValue::Null))
                    .collect();
                Row::new(cells, row.source_line)
            })
            .collect();

        Table { columns, rows }
    }

    /// Infer column types and kinds from data
    pub fn infer_column_types(&mut self) {
        for col_idx in 0..self.column_count() {
            let inferred = self
                .column_values(col_idx)
                .fold(CellType::Null, |acc, cell| acc.widen(cell.cell_type()));

            if let Some(col) = self.columns.get_mut(col_idx) {
                col.inferred_type = inferred;
                col.kind = inferred.kind();
            }
        }
    }

    /// Compare column names and cell values, ignoring types and source lines
    pub fn content_eq(&self, other: &Table) -> bool {
        self.column_names() == other.column_names()
            && self.rows.len() == other.rows.len()
            && self
                .rows
                .iter()
                .zip(&other.rows)
                .all(|(a, b)| a.cells == b.cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnKind;

    fn sample() -> Table {
        Table::from_rows(
            vec!["name", "age", "score"],
            vec![
                vec!["Alice".into(), CellValue::Int(30), CellValue::Float(1.5)],
                vec!["Bob".into(), CellValue::Null, CellValue::Int(2)],
            ],
        )
    }

    #[test]
    fn test_infer_column_types() {
        let table = sample();
        assert_eq!(table.columns[0].kind, ColumnKind::Text);
        assert_eq!(table.columns[1].inferred_type, CellType::Int);
        assert_eq!(table.columns[2].inferred_type, CellType::Float);
        assert!(table.columns[2].is_numeric());
    }

    #[test]
    fn test_missing_detection() {
        assert!(CellValue::Null.is_missing());
        assert!(CellValue::Float(f64::NAN).is_missing());
        assert!(CellValue::String("  ".into()).is_missing());
        assert!(CellValue::String("NA".into()).is_missing());
        assert!(!CellValue::String("Nancy".into()).is_missing());
        assert!(!CellValue::Int(0).is_missing());
    }

    #[test]
    fn test_cross_type_numeric_equality() {
        assert_eq!(CellValue::Int(30), CellValue::Float(30.0));
        assert_ne!(CellValue::Int(30), CellValue::Float(30.5));
        assert_eq!(CellValue::Float(30.0).to_field(), "30");
    }

    #[test]
    fn test_datetime_field_is_iso() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert_eq!(CellValue::DateTime(dt).to_field(), "2024-03-01T10:00:00");
        assert_eq!(CellValue::Date(dt.date()).to_field(), "2024-03-01");
    }

    #[test]
    fn test_select_indices_and_head() {
        let table = sample();
        let sub = table.select_indices(&[2, 0]);
        assert_eq!(sub.column_names(), vec!["score", "name"]);
        assert_eq!(sub.rows[1].cells, vec![CellValue::Int(2), "Bob".into()]);

        let head = table.head(1);
        assert_eq!(head.row_count(), 1);
        assert_eq!(head.column_count(), 3);
    }
}
