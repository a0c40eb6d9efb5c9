//! Data model for tabular data representation

mod report;
mod schema;
mod table;

pub use report::{ExportArtifact, MissingValueReport};
pub use schema::{dedupe_names, CellType, Column, ColumnKind};
pub use table::{is_missing_sentinel, CellValue, Row, Table, MISSING_SENTINELS};
