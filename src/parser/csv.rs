//! Delimited text parser (CSV, TSV)

use chrono::{NaiveDate, NaiveDateTime};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{dedupe_names, is_missing_sentinel, CellValue, Column, Table};

use super::Parser;

const FORMAT: &str = "CSV";

/// Parser for delimited text files
pub struct CsvParser {
    delimiter: u8,
    extension: &'static str,
}

impl CsvParser {
    /// Comma-separated values (`.csv`)
    pub fn comma() -> Self {
        Self {
            delimiter: b',',
            extension: "csv",
        }
    }

    /// Tab-separated values (`.tsv`)
    pub fn tab() -> Self {
        Self {
            delimiter: b'\t',
            extension: "tsv",
        }
    }
}

impl Parser for CsvParser {
    fn parse(&self, bytes: &[u8], config: &Config) -> Result<Table> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .delimiter(config.delimiter.unwrap_or(self.delimiter))
            .from_reader(bytes);

        // Read headers
        let headers = csv_reader
            .headers()
            .map_err(|e| Error::parse(FORMAT, format!("failed to read header row: {}", e)))?
            .clone();

        if headers.is_empty() {
            return Err(Error::parse(FORMAT, "no columns to parse"));
        }

        let columns: Vec<Column> = dedupe_names(headers.iter())
            .into_iter()
            .map(Column::new)
            .collect();

        let mut table = Table::new(columns);

        // Read rows; the reader rejects records whose width differs from the header
        for (line_num, result) in csv_reader.records().enumerate() {
            let record = result.map_err(|e| Error::parse(FORMAT, e.to_string()))?;
            let cells: Vec<CellValue> = record.iter().map(parse_cell_value).collect();
            table.add_row(cells, line_num + 2); // +2 for 1-indexing and header
        }

        table.infer_column_types();

        Ok(table)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        ext == self.extension
    }
}

/// Parse a string value into a CellValue with type inference
fn parse_cell_value(s: &str) -> CellValue {
    let trimmed = s.trim();

    if is_missing_sentinel(trimmed) {
        return CellValue::Null;
    }

    if trimmed.eq_ignore_ascii_case("true") {
        return CellValue::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return CellValue::Bool(false);
    }

    if let Ok(i) = trimmed.parse::<i64>() {
        return CellValue::Int(i);
    }

    if let Ok(f) = trimmed.parse::<f64>() {
        return CellValue::Float(f);
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return CellValue::Date(date);
    }

    // ISO 8601, with either separator
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return CellValue::DateTime(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return CellValue::DateTime(dt);
    }

    CellValue::String(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellType, ColumnKind};

    fn parse(input: &str) -> Result<Table> {
        CsvParser::comma().parse(input.as_bytes(), &Config::default())
    }

    #[test]
    fn test_parse_cell_value() {
        assert_eq!(parse_cell_value(""), CellValue::Null);
        assert_eq!(parse_cell_value("null"), CellValue::Null);
        assert_eq!(parse_cell_value(" NA "), CellValue::Null);
        assert_eq!(parse_cell_value("True"), CellValue::Bool(true));
        assert_eq!(parse_cell_value("false"), CellValue::Bool(false));
        assert_eq!(parse_cell_value("42"), CellValue::Int(42));
        assert_eq!(parse_cell_value("3.25"), CellValue::Float(3.25));
        assert_eq!(
            parse_cell_value("2024-03-01"),
            CellValue::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        );
        assert_eq!(parse_cell_value("hello"), CellValue::String("hello".to_string()));
        // Text keeps its surrounding whitespace
        assert_eq!(parse_cell_value(" hi "), CellValue::String(" hi ".to_string()));
    }

    #[test]
    fn test_parse_table() {
        let table = parse("name,age\nAlice,30\nBob,\n").unwrap();
        assert_eq!(table.column_names(), vec!["name", "age"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[1].cells[1], CellValue::Null);
        assert_eq!(table.rows[1].source_line, 3);

        let age = table.column("age").unwrap();
        assert_eq!(age.inferred_type, CellType::Int);
        assert_eq!(age.kind, ColumnKind::Numeric);
        assert_eq!(table.column("name").unwrap().kind, ColumnKind::Text);
    }

    #[test]
    fn test_mixed_column() {
        let table = parse("v\n1\nabc\n").unwrap();
        assert_eq!(table.columns[0].kind, ColumnKind::Mixed);
    }

    #[test]
    fn test_inconsistent_width_is_parse_error() {
        let err = parse("a,b\n1,2\n3,4,5\n").unwrap_err();
        assert!(matches!(err, Error::Parse { format: "CSV", .. }));
    }

    #[test]
    fn test_empty_input_is_parse_error() {
        assert!(matches!(parse("").unwrap_err(), Error::Parse { .. }));
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let bytes = b"name\n\xff\xfe\n";
        let err = CsvParser::comma()
            .parse(bytes, &Config::default())
            .unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_duplicate_headers_are_renamed() {
        let table = parse("a,a,\n1,2,3\n").unwrap();
        assert_eq!(table.column_names(), vec!["a", "a.1", "Unnamed: 2"]);
    }

    #[test]
    fn test_tab_and_delimiter_override() {
        let table = CsvParser::tab()
            .parse(b"a\tb\n1\t2\n", &Config::default())
            .unwrap();
        assert_eq!(table.column_names(), vec!["a", "b"]);

        let config = Config::default().with_delimiter(b';');
        let table = CsvParser::comma().parse(b"a;b\n1;2\n", &config).unwrap();
        assert_eq!(table.rows[0].cells, vec![CellValue::Int(1), CellValue::Int(2)]);
    }
}
