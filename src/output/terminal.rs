//! Plain terminal report

use std::io::Write;

use anyhow::Result;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::model::{MissingValueReport, Table};
use crate::pipeline::{FileOutcome, FileReport};

use super::OutputFormatter;

/// Width of the longest bar in a chart
const BAR_WIDTH: usize = 40;
/// Rows drawn per chart series
const CHART_ROWS: usize = 20;

/// Terminal output
pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }

    fn write_header(&self, writer: &mut dyn Write, file_name: &str) -> Result<()> {
        writeln!(writer, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(writer, " {}", file_name)?;
        writeln!(writer, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_report(&self, report: &FileReport, preview_rows: usize, writer: &mut dyn Write) -> Result<()> {
        writeln!(
            writer,
            "Loaded {} rows × {} columns",
            report.row_count, report.column_count
        )?;
        writeln!(writer)?;

        self.write_section("Preview:", &report.preview, writer)?;

        if let Some(missing) = &report.missing {
            self.write_missing(missing, writer)?;
        }

        if let Some(filled) = &report.filled_preview {
            self.write_section("After filling missing values:", filled, writer)?;
        }

        self.write_section("Selected columns:", &report.projected_preview(preview_rows), writer)?;

        if let Some(chart) = &report.chart {
            self.write_chart(chart, writer)?;
        }

        if let Some(artifact) = &report.artifact {
            writeln!(
                writer,
                "Export: {} ({}, {} bytes)",
                artifact.filename(),
                artifact.media_type(),
                artifact.bytes().len()
            )?;
            writeln!(writer)?;
        }

        Ok(())
    }

    fn write_section(&self, title: &str, table: &Table, writer: &mut dyn Write) -> Result<()> {
        writeln!(writer, "{}", title)?;
        writeln!(writer, "{}", render_table(table))?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_missing(&self, missing: &MissingValueReport, writer: &mut dyn Write) -> Result<()> {
        let mut builder = Builder::default();
        builder.push_record(["column".to_string(), "missing".to_string()]);
        for (column, count) in missing.iter() {
            builder.push_record([column.to_string(), count.to_string()]);
        }
        let mut table = builder.build();
        table.with(Style::modern());

        writeln!(writer, "Missing values ({} total):", missing.total())?;
        writeln!(writer, "{}", table)?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_chart(&self, chart: &Table, writer: &mut dyn Write) -> Result<()> {
        writeln!(writer, "Chart:")?;
        for (idx, column) in chart.columns.iter().enumerate() {
            let values: Vec<Option<f64>> = chart.column_values(idx).map(|c| c.as_f64()).collect();
            let scale = values
                .iter()
                .flatten()
                .fold(0.0_f64, |acc, v| acc.max(v.abs()));

            writeln!(writer, "  {}", column.name)?;
            for (row, value) in values.iter().take(CHART_ROWS).enumerate() {
                match value {
                    Some(v) => writeln!(writer, "  {:>5} │{} {}", row, bar(*v, scale), v)?,
                    None => writeln!(writer, "  {:>5} │", row)?,
                }
            }
            if values.len() > CHART_ROWS {
                writeln!(writer, "        … {} more rows", values.len() - CHART_ROWS)?;
            }
        }
        writeln!(writer)?;
        Ok(())
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TerminalOutput {
    fn render(&self, outcomes: &[FileOutcome], preview_rows: usize, writer: &mut dyn Write) -> Result<()> {
        for outcome in outcomes {
            self.write_header(writer, &outcome.file_name)?;
            match &outcome.result {
                Ok(report) => self.write_report(report, preview_rows, writer)?,
                Err(e) => {
                    writeln!(writer, "Error: {}", e)?;
                    writeln!(writer)?;
                }
            }
        }
        Ok(())
    }
}

/// Box-drawn table with a header row
fn render_table(table: &Table) -> String {
    if table.columns.is_empty() {
        return "(no columns)".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(table.columns.iter().map(|c| c.name.clone()));
    for row in &table.rows {
        builder.push_record(row.cells.iter().map(|c| c.display().into_owned()));
    }

    let mut rendered = builder.build();
    rendered.with(Style::modern());
    rendered.to_string()
}

fn bar(value: f64, scale: f64) -> String {
    if !value.is_finite() || scale <= 0.0 || !scale.is_finite() {
        return String::new();
    }
    let len = ((value.abs() / scale) * BAR_WIDTH as f64).round() as usize;
    let glyph = if value < 0.0 { "░" } else { "█" };
    glyph.repeat(len.min(BAR_WIDTH))
}
