//! Cleaning stages applied to a loaded table
//!
//! Each stage is a free function over a [`Table`](crate::model::Table) value.
//! Stages are independent of each other; the pipeline decides which ones run.

mod chart;
mod impute;
mod missing;
mod project;

pub use chart::{chart_sample, CHART_SERIES_LIMIT};
pub use impute::{column_mean, fill_missing_with_mean};
pub use missing::analyze_missing;
pub use project::project_columns;
