//! Single-sheet Office Open XML (xlsx) export
//!
//! The workbook is assembled by hand: a handful of fixed XML parts plus one
//! worksheet, zipped together. Text is written as inline strings, so no
//! shared-string table is needed. Dates are serial numbers carrying a
//! built-in date format.

use std::io::{Cursor, Write};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};
use crate::model::{CellValue, Table};

use super::Exporter;

const FORMAT: &str = "xlsx";

/// Row limit of a worksheet, header included
pub const MAX_ROWS: usize = 1_048_576;
/// Column limit of a worksheet
pub const MAX_COLUMNS: usize = 16_384;
/// Character limit of a single cell
pub const MAX_CELL_CHARS: usize = 32_767;

const SHEET_NAME: &str = "Sheet1";

/// Index into `cellXfs` of the date style (`m/d/yyyy`)
const DATE_STYLE: u8 = 1;
/// Index into `cellXfs` of the datetime style (`m/d/yyyy h:mm`)
const DATETIME_STYLE: u8 = 2;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts><fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="3"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="14" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/><xf numFmtId="22" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/></cellXfs><cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles></styleSheet>"#;

/// Writes a table as the only sheet of an xlsx workbook
pub struct XlsxExporter {
    sheet_name: String,
}

impl XlsxExporter {
    pub fn new() -> Self {
        Self {
            sheet_name: SHEET_NAME.to_string(),
        }
    }

    fn workbook_xml(&self) -> String {
        format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                "\n",
                r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
                r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
                r#"<sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#
            ),
            xml_escape(&self.sheet_name)
        )
    }
}

impl Default for XlsxExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for XlsxExporter {
    fn write(&self, table: &Table) -> Result<Vec<u8>> {
        check_limits(table)?;
        let sheet = sheet_xml(table)?;
        let workbook = self.workbook_xml();

        let parts: [(&str, &str); 6] = [
            ("[Content_Types].xml", CONTENT_TYPES),
            ("_rels/.rels", ROOT_RELS),
            ("xl/workbook.xml", workbook.as_str()),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
            ("xl/styles.xml", STYLES),
            ("xl/worksheets/sheet1.xml", sheet.as_str()),
        ];

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, contents) in parts {
            let options =
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
            zip.start_file(name, options)
                .map_err(|e| Error::serialization(FORMAT, format!("{}: {}", name, e)))?;
            zip.write_all(contents.as_bytes())
                .map_err(|e| Error::serialization(FORMAT, format!("{}: {}", name, e)))?;
        }

        let cursor = zip
            .finish()
            .map_err(|e| Error::serialization(FORMAT, e.to_string()))?;
        Ok(cursor.into_inner())
    }
}

fn check_limits(table: &Table) -> Result<()> {
    if table.row_count() + 1 > MAX_ROWS {
        return Err(Error::serialization(
            FORMAT,
            format!(
                "{} rows plus header exceed the sheet limit of {}",
                table.row_count(),
                MAX_ROWS
            ),
        ));
    }
    if table.column_count() > MAX_COLUMNS {
        return Err(Error::serialization(
            FORMAT,
            format!(
                "{} columns exceed the sheet limit of {}",
                table.column_count(),
                MAX_COLUMNS
            ),
        ));
    }
    Ok(())
}

/// Build the worksheet part
fn sheet_xml(table: &Table) -> Result<String> {
    let mut xml = String::with_capacity(256 + table.row_count() * table.column_count() * 24);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#);

    let dimension = if table.column_count() == 0 {
        "A1".to_string()
    } else {
        format!(
            "A1:{}{}",
            column_letter(table.column_count() - 1),
            table.row_count() + 1
        )
    };
    xml.push_str(&format!(r#"<dimension ref="{}"/><sheetData>"#, dimension));

    // Header
    xml.push_str(r#"<row r="1">"#);
    for (col_idx, column) in table.columns.iter().enumerate() {
        push_inline_string(&mut xml, &cell_ref(col_idx, 1), &column.name)?;
    }
    xml.push_str("</row>");

    for (row_idx, row) in table.rows.iter().enumerate() {
        let row_num = row_idx + 2;
        xml.push_str(&format!(r#"<row r="{}">"#, row_num));
        for (col_idx, cell) in row.cells.iter().enumerate() {
            let reference = cell_ref(col_idx, row_num);
            match cell {
                // Missing cells are simply absent from the sheet
                CellValue::Null => {}
                CellValue::Float(f) if f.is_nan() => {}
                CellValue::Float(f) if f.is_infinite() => {
                    return Err(Error::serialization(
                        FORMAT,
                        format!("cell {} holds {}, which a sheet cannot store", reference, f),
                    ));
                }
                CellValue::Float(f) => {
                    xml.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, reference, f));
                }
                CellValue::Int(i) => {
                    xml.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, reference, i));
                }
                CellValue::Bool(b) => {
                    xml.push_str(&format!(
                        r#"<c r="{}" t="b"><v>{}</v></c>"#,
                        reference,
                        u8::from(*b)
                    ));
                }
                CellValue::Date(d) => match datetime_to_serial(d.and_time(NaiveTime::MIN)) {
                    Some(serial) => push_date(&mut xml, &reference, serial, DATE_STYLE),
                    None => push_inline_string(&mut xml, &reference, &cell.to_field())?,
                },
                CellValue::DateTime(dt) => match datetime_to_serial(*dt) {
                    Some(serial) => push_date(&mut xml, &reference, serial, DATETIME_STYLE),
                    None => push_inline_string(&mut xml, &reference, &cell.to_field())?,
                },
                CellValue::String(s) => push_inline_string(&mut xml, &reference, s)?,
            }
        }
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData></worksheet>");
    Ok(xml)
}

fn push_date(xml: &mut String, reference: &str, serial: f64, style: u8) {
    xml.push_str(&format!(
        r#"<c r="{}" s="{}"><v>{}</v></c>"#,
        reference, style, serial
    ));
}

/// Days since 1899-12-30, the spreadsheet date epoch.
///
/// Dates before the epoch have no serial and are written as text.
fn datetime_to_serial(dt: NaiveDateTime) -> Option<f64> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_time(NaiveTime::MIN);
    let millis = (dt - epoch).num_milliseconds();
    if millis < 0 {
        return None;
    }
    Some(millis as f64 / 86_400_000.0)
}

fn push_inline_string(xml: &mut String, reference: &str, text: &str) -> Result<()> {
    if text.chars().count() > MAX_CELL_CHARS {
        return Err(Error::serialization(
            FORMAT,
            format!(
                "cell {} is longer than {} characters",
                reference, MAX_CELL_CHARS
            ),
        ));
    }
    if let Some(c) = text.chars().find(|&c| !is_xml_char(c)) {
        return Err(Error::serialization(
            FORMAT,
            format!("cell {} contains the illegal character {:?}", reference, c),
        ));
    }

    let space = if text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace) {
        r#" xml:space="preserve""#
    } else {
        ""
    };
    xml.push_str(&format!(
        r#"<c r="{}" t="inlineStr"><is><t{}>{}</t></is></c>"#,
        reference,
        space,
        xml_escape(text)
    ));
    Ok(())
}

/// Characters allowed in an XML 1.0 document
fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// A1-style reference for a 0-based column and 1-based row
fn cell_ref(col_idx: usize, row_num: usize) -> String {
    format!("{}{}", column_letter(col_idx), row_num)
}

/// Spreadsheet column name for a 0-based index: 0 → A, 25 → Z, 26 → AA
fn column_letter(mut idx: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (idx % 26) as u8);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }
    letters.iter().rev().map(|&b| b as char).collect()
}
