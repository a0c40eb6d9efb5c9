//! Configuration handling for dataclean

/// Report format for the command-line shell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" => Ok(OutputFormat::Terminal),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Target format for an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    /// File extension, without the dot
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    /// MIME type of the exported bytes
    pub fn media_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    /// Name shown to users
    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Xlsx => "Excel",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "excel" | "xlsx" => Ok(ExportFormat::Xlsx),
            _ => Err(format!("Unknown export format: {} (expected CSV or Excel)", s)),
        }
    }
}

/// Per-file pipeline configuration.
///
/// Every toggle the shell exposes lives here, so a run depends only on the
/// uploaded bytes and this value.
#[derive(Debug, Clone)]
pub struct Config {
    /// Override the delimiter of the text decoder
    pub delimiter: Option<u8>,
    /// For spreadsheets: which sheet to read (first sheet when unset)
    pub sheet_name: Option<String>,
    /// Number of rows in each preview
    pub preview_rows: usize,
    /// Fill missing numeric values with column means
    pub fill_missing: bool,
    /// Columns to keep; `None` keeps all
    pub keep_columns: Option<Vec<String>>,
    /// Extract the chart sample
    pub show_chart: bool,
    /// Produce an export artifact in this format
    pub export_format: Option<ExportFormat>,
    /// Report format for the shell
    pub output_format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delimiter: None,
            sheet_name: None,
            preview_rows: 5,
            fill_missing: false,
            keep_columns: None,
            show_chart: false,
            export_format: None,
            output_format: OutputFormat::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text decoder delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Set the spreadsheet sheet name
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = Some(name.into());
        self
    }

    /// Set preview length
    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    /// Enable mean imputation
    pub fn with_fill_missing(mut self, fill: bool) -> Self {
        self.fill_missing = fill;
        self
    }

    /// Keep only these columns
    pub fn with_keep_columns(mut self, columns: Vec<String>) -> Self {
        self.keep_columns = Some(columns);
        self
    }

    /// Enable the chart sample
    pub fn with_show_chart(mut self, show: bool) -> Self {
        self.show_chart = show;
        self
    }

    /// Request an export
    pub fn with_export_format(mut self, format: ExportFormat) -> Self {
        self.export_format = Some(format);
        self
    }

    /// Set report format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }
}
