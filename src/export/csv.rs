//! CSV export

use crate::error::{Error, Result};
use crate::model::Table;

use super::Exporter;

const FORMAT: &str = "CSV";

/// Writes comma-separated values with `\n` record terminators
pub struct CsvExporter {
    delimiter: u8,
}

impl CsvExporter {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for CsvExporter {
    fn write(&self, table: &Table) -> Result<Vec<u8>> {
        // An empty record would be written as `""`, which reads back as a column
        if table.columns.is_empty() {
            return Ok(vec![b'\n'; table.row_count() + 1]);
        }

        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer
            .write_record(table.columns.iter().map(|c| c.name.as_str()))
            .map_err(|e| Error::serialization(FORMAT, e.to_string()))?;

        for row in &table.rows {
            writer
                .write_record(row.cells.iter().map(|c| c.to_field().into_owned()))
                .map_err(|e| {
                    Error::serialization(FORMAT, format!("row {}: {}", row.source_line, e))
                })?;
        }

        writer
            .into_inner()
            .map_err(|e| Error::serialization(FORMAT, e.to_string()))
    }
}
