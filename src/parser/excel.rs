//! Spreadsheet parser (xlsx, xlsm, xls, ods)

use std::io::Cursor;

use calamine::{open_workbook_from_rs, Data, Ods, Range, Reader, Xls, Xlsx};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{dedupe_names, is_missing_sentinel, CellValue, Column, Table};

use super::Parser;

const FORMAT: &str = "spreadsheet";

/// Container family of a spreadsheet file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetFlavor {
    /// Office Open XML (`.xlsx`, `.xlsm`)
    Xlsx,
    /// Legacy binary workbook (`.xls`)
    Xls,
    /// OpenDocument (`.ods`)
    Ods,
}

/// Parser for spreadsheet files
pub struct ExcelParser {
    flavor: SpreadsheetFlavor,
}

impl ExcelParser {
    pub fn new(flavor: SpreadsheetFlavor) -> Self {
        Self { flavor }
    }
}

impl Parser for ExcelParser {
    fn parse(&self, bytes: &[u8], config: &Config) -> Result<Table> {
        let sheet = config.sheet_name.as_deref();
        let range = match self.flavor {
            SpreadsheetFlavor::Xlsx => read_range::<Xlsx<_>>(bytes, sheet)?,
            SpreadsheetFlavor::Xls => read_range::<Xls<_>>(bytes, sheet)?,
            SpreadsheetFlavor::Ods => read_range::<Ods<_>>(bytes, sheet)?,
        };

        parse_range(&range)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        match self.flavor {
            SpreadsheetFlavor::Xlsx => matches!(ext, "xlsx" | "xlsm"),
            SpreadsheetFlavor::Xls => ext == "xls",
            SpreadsheetFlavor::Ods => ext == "ods",
        }
    }
}

/// Open the workbook and read the configured sheet, or the first one
fn read_range<'a, R>(bytes: &'a [u8], sheet: Option<&str>) -> Result<Range<Data>>
where
    R: Reader<Cursor<&'a [u8]>>,
    R::Error: std::fmt::Display,
{
    let mut workbook: R = open_workbook_from_rs(Cursor::new(bytes))
        .map_err(|e| Error::parse(FORMAT, format!("failed to open workbook: {}", e)))?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| Error::parse(FORMAT, "no sheets found in workbook"))?,
    };

    workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| Error::parse(FORMAT, format!("failed to read sheet {}: {}", sheet_name, e)))
}

fn parse_range(range: &Range<Data>) -> Result<Table> {
    let (row_count, col_count) = range.get_size();

    if row_count == 0 || col_count == 0 {
        return Err(Error::parse(FORMAT, "empty sheet"));
    }

    // First row is header
    let header_row = range
        .rows()
        .next()
        .ok_or_else(|| Error::parse(FORMAT, "no header row found"))?;

    let columns: Vec<Column> = dedupe_names(header_row.iter().map(header_name))
        .into_iter()
        .map(Column::new)
        .collect();

    let mut table = Table::new(columns);

    for (line_num, row) in range.rows().skip(1).enumerate() {
        let mut cells: Vec<CellValue> = row.iter().take(col_count).map(convert_cell).collect();
        cells.resize(col_count, CellValue::Null);
        table.add_row(cells, line_num + 2); // +2 for 1-indexing and header
    }

    table.infer_column_types();

    Ok(table)
}

fn header_name(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        other => convert_cell(other).to_field().into_owned(),
    }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => {
            if is_missing_sentinel(s) {
                CellValue::Null
            } else {
                CellValue::String(s.clone())
            }
        }
        Data::Float(f) => {
            // Whole numbers are stored as floats by spreadsheets
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                CellValue::Int(*f as i64)
            } else {
                CellValue::Float(*f)
            }
        }
        Data::Int(i) => CellValue::Int(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match serial_to_datetime(dt.as_f64()) {
            Some(datetime) if datetime.time() == NaiveTime::MIN => CellValue::Date(datetime.date()),
            Some(datetime) => CellValue::DateTime(datetime),
            None => CellValue::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) => {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                CellValue::DateTime(dt)
            } else if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                CellValue::Date(d)
            } else {
                CellValue::String(s.clone())
            }
        }
        Data::DurationIso(s) => CellValue::String(s.clone()),
        // Formula errors such as #N/A or #DIV/0! carry no value
        Data::Error(_) => CellValue::Null,
    }
}

/// Convert a spreadsheet serial date (days since 1899-12-30) to a datetime
fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(0.0..=2_958_465.0).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_time(NaiveTime::MIN);
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(Duration::milliseconds(millis))
}
