//! JSON output format

use std::io::Write;

use anyhow::Result;
use indexmap::IndexMap;
use serde::Serialize;

use crate::model::{CellValue, MissingValueReport, Table};
use crate::pipeline::{FileOutcome, FileReport};

use super::OutputFormatter;

/// JSON output formatter
pub struct JsonOutput {
    pretty: bool,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

/// Rows as objects keyed by column name, in column order
type JsonRows<'a> = Vec<IndexMap<&'a str, &'a CellValue>>;

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum JsonFile<'a> {
    Ok(JsonReport<'a>),
    Error { file: &'a str, error: String },
}

#[derive(Serialize)]
struct JsonReport<'a> {
    file: &'a str,
    rows: usize,
    columns: usize,
    preview: JsonRows<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    missing: Option<&'a MissingValueReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filled_preview: Option<JsonRows<'a>>,
    selected_columns: Vec<&'a str>,
    selected_preview: JsonRows<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chart: Option<IndexMap<&'a str, Vec<&'a CellValue>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    export: Option<JsonExport<'a>>,
}

#[derive(Serialize)]
struct JsonExport<'a> {
    filename: &'a str,
    media_type: &'a str,
    bytes: usize,
}

fn rows_to_json(table: &Table, limit: usize) -> JsonRows<'_> {
    table
        .rows
        .iter()
        .take(limit)
        .map(|row| {
            table
                .columns
                .iter()
                .map(|c| c.name.as_str())
                .zip(row.cells.iter())
                .collect()
        })
        .collect()
}

fn chart_to_json(table: &Table) -> IndexMap<&str, Vec<&CellValue>> {
    table
        .columns
        .iter()
        .enumerate()
        .map(|(idx, col)| (col.name.as_str(), table.column_values(idx).collect()))
        .collect()
}

fn report_to_json(report: &FileReport, preview_rows: usize) -> JsonReport<'_> {
    JsonReport {
        file: &report.file_name,
        rows: report.row_count,
        columns: report.column_count,
        preview: rows_to_json(&report.preview, preview_rows),
        missing: report.missing.as_ref(),
        filled_preview: report
            .filled_preview
            .as_ref()
            .map(|t| rows_to_json(t, preview_rows)),
        selected_columns: report.projected.column_names(),
        selected_preview: rows_to_json(&report.projected, preview_rows),
        chart: report.chart.as_ref().map(chart_to_json),
        export: report.artifact.as_ref().map(|a| JsonExport {
            filename: a.filename(),
            media_type: a.media_type(),
            bytes: a.bytes().len(),
        }),
    }
}

impl OutputFormatter for JsonOutput {
    fn render(&self, outcomes: &[FileOutcome], preview_rows: usize, writer: &mut dyn Write) -> Result<()> {
        let files: Vec<JsonFile<'_>> = outcomes
            .iter()
            .map(|outcome| match &outcome.result {
                Ok(report) => JsonFile::Ok(report_to_json(report, preview_rows)),
                Err(e) => JsonFile::Error {
                    file: &outcome.file_name,
                    error: e.to_string(),
                },
            })
            .collect();

        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &files)?;
        } else {
            serde_json::to_writer(&mut *writer, &files)?;
        }
        writeln!(writer)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ExportFormat};
    use crate::pipeline::process_batch;
    use crate::pipeline::FileSession;

    #[test]
    fn test_batch_as_json() {
        let config = Config::new()
            .with_fill_missing(true)
            .with_show_chart(true)
            .with_export_format(ExportFormat::Csv);
        let sessions = vec![
            FileSession::new("people.csv", b"name,age\nAlice,30\nBob,\n".to_vec(), config),
            FileSession::new("notes.txt", Vec::new(), Config::default()),
        ];
        let outcomes = process_batch(&sessions);

        let mut out = Vec::new();
        JsonOutput::compact().render(&outcomes, 5, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        let ok = &value[0];
        assert_eq!(ok["status"], "ok");
        assert_eq!(ok["rows"], 2);
        assert_eq!(ok["missing"]["age"], 1);
        assert_eq!(ok["missing"]["name"], 0);
        assert!(ok["preview"][1]["age"].is_null());
        assert_eq!(ok["filled_preview"][1]["age"], 30.0);
        assert_eq!(ok["chart"]["age"][0], 30);
        assert_eq!(ok["export"]["filename"], "people.csv");

        let err = &value[1];
        assert_eq!(err["status"], "error");
        assert_eq!(err["file"], "notes.txt");
    }

    #[test]
    fn test_no_missing_key_when_complete() {
        let sessions = vec![FileSession::new(
            "full.csv",
            b"a\n1\n".to_vec(),
            Config::default(),
        )];
        let mut out = Vec::new();
        JsonOutput::new()
            .render(&process_batch(&sessions), 5, &mut out)
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert!(value[0].get("missing").is_none());
        assert!(value[0].get("export").is_none());
    }
}
