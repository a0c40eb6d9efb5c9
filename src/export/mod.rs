//! Export layer: serializes a [`Table`] into a downloadable artifact

mod csv;
mod xlsx;

use tracing::debug;

use crate::config::ExportFormat;
use crate::error::Result;
use crate::model::{ExportArtifact, Table};

pub use self::csv::CsvExporter;
pub use self::xlsx::XlsxExporter;

/// Trait for table encoders
pub trait Exporter {
    /// Encode the whole table, header row first, without an index column
    fn write(&self, table: &Table) -> Result<Vec<u8>>;
}

/// Factory for creating exporters
pub struct ExporterFactory;

impl ExporterFactory {
    /// Create an exporter for the target format
    pub fn create(format: ExportFormat) -> Box<dyn Exporter> {
        match format {
            ExportFormat::Csv => Box::new(CsvExporter::new()),
            ExportFormat::Xlsx => Box::new(XlsxExporter::new()),
        }
    }
}

/// Serialize a table and wrap it with its media type and download name
pub fn export_table(
    table: &Table,
    format: ExportFormat,
    original_name: &str,
) -> Result<ExportArtifact> {
    let bytes = ExporterFactory::create(format).write(table)?;
    let filename = export_filename(original_name, format);
    debug!(%filename, bytes = bytes.len(), "exported table");
    Ok(ExportArtifact::new(bytes, format.media_type(), filename))
}

/// Replace the last extension of `original_name` with the format's extension
pub fn export_filename(original_name: &str, format: ExportFormat) -> String {
    let base = original_name
        .rsplit_once('.')
        .map(|(base, _)| base)
        .unwrap_or(original_name);
    format!("{}.{}", base, format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_filename() {
        assert_eq!(export_filename("sales.xlsx", ExportFormat::Csv), "sales.csv");
        assert_eq!(export_filename("sales.csv", ExportFormat::Xlsx), "sales.xlsx");
        assert_eq!(export_filename("q1.report.csv", ExportFormat::Csv), "q1.report.csv");
        assert_eq!(export_filename("noext", ExportFormat::Xlsx), "noext.xlsx");
    }

    #[test]
    fn test_artifact_metadata() {
        let table = Table::from_rows(vec!["a"], vec![vec![1i64.into()]]);

        let artifact = export_table(&table, ExportFormat::Csv, "in.xlsx").unwrap();
        assert_eq!(artifact.media_type(), "text/csv");
        assert_eq!(artifact.filename(), "in.csv");

        let artifact = export_table(&table, ExportFormat::Xlsx, "in.csv").unwrap();
        assert_eq!(
            artifact.media_type(),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert_eq!(artifact.filename(), "in.xlsx");
        assert!(artifact.bytes().starts_with(b"PK\x03\x04"));
    }
}
