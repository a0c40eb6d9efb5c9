//! dataclean - Clean, trim and convert tabular data
//!
//! Loads CSV, TSV and spreadsheet files from bytes, reports missing values,
//! fills numeric gaps with column means, keeps a chosen set of columns and
//! exports the result as CSV or Excel.

pub mod clean;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod output;
pub mod parser;
pub mod pipeline;

pub use config::{Config, ExportFormat};
pub use error::{Error, Result};
pub use model::Table;
pub use pipeline::{process_batch, FileOutcome, FileReport, FileSession};
