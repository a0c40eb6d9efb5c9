//! Per-file pipeline: load → analyze → fill → project → chart → export
//!
//! A [`FileSession`] is the whole request context for one upload. Nothing is
//! shared between sessions, so a batch can run them on any number of threads
//! and one file's failure never affects another.

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::clean::{analyze_missing, chart_sample, fill_missing_with_mean, project_columns};
use crate::config::Config;
use crate::error::Result;
use crate::export::export_table;
use crate::model::{ExportArtifact, MissingValueReport, Table};
use crate::parser::ParserFactory;

/// One uploaded file together with the options chosen for it
#[derive(Debug, Clone)]
pub struct FileSession {
    file_name: String,
    bytes: Vec<u8>,
    config: Config,
}

/// Everything the pipeline hands back for one file
#[derive(Debug, Clone)]
pub struct FileReport {
    /// Name of the uploaded file
    pub file_name: String,
    /// Shape of the table as loaded
    pub row_count: usize,
    pub column_count: usize,
    /// First rows of the table as loaded
    pub preview: Table,
    /// Missing-value counts, present only when something is missing
    pub missing: Option<MissingValueReport>,
    /// First rows after imputation, when it was requested
    pub filled_preview: Option<Table>,
    /// Table after column selection
    pub projected: Table,
    /// Numeric sample to chart, when requested and available
    pub chart: Option<Table>,
    /// Export artifact, when a format was requested
    pub artifact: Option<ExportArtifact>,
}

impl FileReport {
    /// First rows of the projected table
    pub fn projected_preview(&self, rows: usize) -> Table {
        self.projected.head(rows)
    }
}

impl FileSession {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>, config: Config) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            config,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Run every configured stage for this file
    pub fn run(&self) -> Result<FileReport> {
        let config = &self.config;
        let rows = config.preview_rows;

        let mut table = ParserFactory::new().parse_file(&self.bytes, &self.file_name, config)?;
        let (row_count, column_count) = (table.row_count(), table.column_count());
        let preview = table.head(rows);

        let report = analyze_missing(&table);
        let missing = report.has_missing().then_some(report);

        let filled_preview = if config.fill_missing {
            fill_missing_with_mean(&mut table);
            Some(table.head(rows))
        } else {
            None
        };

        let projected = match &config.keep_columns {
            Some(keep) => project_columns(&table, keep.as_slice())?,
            None => table,
        };
        debug!(file = %self.file_name, columns = ?projected.column_names(), "selected columns");

        let chart = if config.show_chart {
            let sample = chart_sample(&projected);
            if sample.is_empty() {
                debug!(file = %self.file_name, "no numeric columns to chart");
                None
            } else {
                Some(sample)
            }
        } else {
            None
        };

        let artifact = config
            .export_format
            .map(|format| export_table(&projected, format, &self.file_name))
            .transpose()?;

        info!(
            file = %self.file_name,
            rows = row_count,
            columns = column_count,
            "processed file"
        );

        Ok(FileReport {
            file_name: self.file_name.clone(),
            row_count,
            column_count,
            preview,
            missing,
            filled_preview,
            projected,
            chart,
            artifact,
        })
    }
}

/// Result of one file in a batch
#[derive(Debug)]
pub struct FileOutcome {
    pub file_name: String,
    pub result: Result<FileReport>,
}

impl FileOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Process every session independently, keeping input order.
///
/// Sessions run in parallel; a failing file yields an `Err` outcome and the
/// others still complete.
pub fn process_batch(sessions: &[FileSession]) -> Vec<FileOutcome> {
    sessions
        .par_iter()
        .map(|session| {
            let result = session.run();
            if let Err(ref e) = result {
                warn!(file = %session.file_name(), error = %e, "file failed");
            }
            FileOutcome {
                file_name: session.file_name().to_string(),
                result,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportFormat;
    use crate::error::Error;
    use crate::model::CellValue;

    const PEOPLE: &[u8] = b"name,age\nAlice,30\nBob,\n";

    #[test]
    fn test_defaults_only_preview() {
        let report = FileSession::new("people.csv", PEOPLE.to_vec(), Config::default())
            .run()
            .unwrap();
        assert_eq!((report.row_count, report.column_count), (2, 2));
        assert_eq!(report.preview.row_count(), 2);
        assert_eq!(report.missing.as_ref().and_then(|m| m.get("age")), Some(1));
        assert!(report.filled_preview.is_none());
        assert!(report.chart.is_none());
        assert!(report.artifact.is_none());
        assert_eq!(report.projected.column_names(), vec!["name", "age"]);
    }

    #[test]
    fn test_full_run() {
        let config = Config::new()
            .with_fill_missing(true)
            .with_keep_columns(vec!["age".to_string()])
            .with_show_chart(true)
            .with_export_format(ExportFormat::Csv);
        let report = FileSession::new("people.csv", PEOPLE.to_vec(), config)
            .run()
            .unwrap();

        let filled = report.filled_preview.as_ref().unwrap();
        assert_eq!(filled.rows[1].cells[1], CellValue::Float(30.0));
        assert_eq!(report.projected.column_names(), vec!["age"]);
        assert_eq!(report.chart.as_ref().unwrap().column_names(), vec!["age"]);

        let artifact = report.artifact.as_ref().unwrap();
        assert_eq!(artifact.filename(), "people.csv");
        assert_eq!(artifact.bytes(), b"age\n30\n30\n");
    }

    #[test]
    fn test_preview_is_limited() {
        let csv: String = std::iter::once("n\n".to_string())
            .chain((0..20).map(|i| format!("{}\n", i)))
            .collect();
        let config = Config::default().with_preview_rows(3);
        let report = FileSession::new("n.csv", csv.into_bytes(), config).run().unwrap();
        assert_eq!(report.preview.row_count(), 3);
        assert_eq!(report.row_count, 20);
        assert_eq!(report.projected_preview(3).row_count(), 3);
    }

    #[test]
    fn test_unknown_column_fails() {
        let config = Config::new().with_keep_columns(vec!["salary".to_string()]);
        let err = FileSession::new("people.csv", PEOPLE.to_vec(), config)
            .run()
            .unwrap_err();
        assert!(matches!(err, Error::UnknownColumn { .. }));
    }

    #[test]
    fn test_batch_isolates_failures() {
        let sessions = vec![
            FileSession::new("notes.txt", PEOPLE.to_vec(), Config::default()),
            FileSession::new("people.csv", PEOPLE.to_vec(), Config::default()),
            FileSession::new("broken.csv", b"a,b\n1\n".to_vec(), Config::default()),
        ];

        let outcomes = process_batch(&sessions);
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].file_name, "notes.txt");
        assert!(matches!(
            outcomes[0].result,
            Err(Error::UnsupportedFormat { .. })
        ));
        assert!(outcomes[1].is_ok());
        assert!(matches!(outcomes[2].result, Err(Error::Parse { .. })));
    }
}
