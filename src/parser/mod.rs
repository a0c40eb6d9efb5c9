//! Parser layer: turns uploaded bytes into a [`Table`]

mod csv;
mod excel;

use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::Table;

pub use self::csv::CsvParser;
pub use self::excel::{ExcelParser, SpreadsheetFlavor};

/// Trait for decoding tabular data from an in-memory byte stream
pub trait Parser: Send + Sync {
    /// Decode the bytes and return a Table
    fn parse(&self, bytes: &[u8], config: &Config) -> Result<Table>;

    /// Check if this parser can handle the given (lower-case) file extension
    fn supports_extension(&self, ext: &str) -> bool;
}

/// Factory selecting a parser from the declared file extension
pub struct ParserFactory {
    parsers: Vec<Box<dyn Parser>>,
}

impl Default for ParserFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserFactory {
    /// Create a new parser factory with all supported parsers
    pub fn new() -> Self {
        Self {
            parsers: vec![
                Box::new(CsvParser::comma()),
                Box::new(CsvParser::tab()),
                Box::new(ExcelParser::new(SpreadsheetFlavor::Xlsx)),
                Box::new(ExcelParser::new(SpreadsheetFlavor::Xls)),
                Box::new(ExcelParser::new(SpreadsheetFlavor::Ods)),
            ],
        }
    }

    /// Get a parser for an extension hint (case-insensitive)
    pub fn get_parser(&self, extension: &str) -> Result<&dyn Parser> {
        let ext = extension.trim_start_matches('.').to_lowercase();

        self.parsers
            .iter()
            .find(|parser| parser.supports_extension(&ext))
            .map(|parser| parser.as_ref())
            .ok_or_else(|| Error::UnsupportedFormat {
                extension: if ext.is_empty() {
                    "(none)".to_string()
                } else {
                    ext
                },
            })
    }

    /// Parse bytes using the parser registered for `extension`
    pub fn parse(&self, bytes: &[u8], extension: &str, config: &Config) -> Result<Table> {
        let parser = self.get_parser(extension)?;
        let table = parser.parse(bytes, config)?;
        debug!(
            extension,
            rows = table.row_count(),
            columns = table.column_count(),
            "decoded table"
        );
        Ok(table)
    }

    /// Parse an upload, taking the extension from its file name
    pub fn parse_file(&self, bytes: &[u8], file_name: &str, config: &Config) -> Result<Table> {
        self.parse(bytes, file_extension(file_name), config)
    }
}

/// Extension of a file name: the text after the last dot, or "" if none
pub fn file_extension(file_name: &str) -> &str {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .unwrap_or("")
}
