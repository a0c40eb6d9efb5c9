//! Missing-value analysis

use indexmap::IndexMap;

use crate::model::{MissingValueReport, Table};

/// Count missing cells per column.
///
/// The report keeps table column order; `has_missing()` on the result tells
/// whether anything is missing at all.
pub fn analyze_missing(table: &Table) -> MissingValueReport {
    let counts: IndexMap<String, usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(idx, col)| {
            let missing = table.column_values(idx).filter(|c| c.is_missing()).count();
            (col.name.clone(), missing)
        })
        .collect();

    MissingValueReport::new(counts)
}
