//! Numeric sample for charting

use crate::model::Table;

/// Maximum number of numeric series handed to a chart
pub const CHART_SERIES_LIMIT: usize = 2;

/// The first numeric columns of the table, at most [`CHART_SERIES_LIMIT`].
///
/// A zero-column result means there is nothing to chart.
pub fn chart_sample(table: &Table) -> Table {
    let indices: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .filter(|(_, col)| col.is_numeric())
        .map(|(idx, _)| idx)
        .take(CHART_SERIES_LIMIT)
        .collect();

    table.select_indices(&indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellValue;

    #[test]
    fn test_first_two_numeric_columns() {
        let table = Table::from_rows(
            vec!["name", "a", "b", "c"],
            vec![vec![
                "x".into(),
                CellValue::Int(1),
                CellValue::Float(2.5),
                CellValue::Int(3),
            ]],
        );
        let sample = chart_sample(&table);
        assert_eq!(sample.column_names(), vec!["a", "b"]);
        assert_eq!(sample.row_count(), 1);
    }

    #[test]
    fn test_single_numeric_column() {
        let table = Table::from_rows(
            vec!["name", "a"],
            vec![vec!["x".into(), CellValue::Int(1)]],
        );
        assert_eq!(chart_sample(&table).column_names(), vec!["a"]);
    }

    #[test]
    fn test_no_numeric_columns() {
        let table = Table::from_rows(
            vec!["name", "mixed"],
            vec![
                vec!["x".into(), CellValue::Int(1)],
                vec!["y".into(), "two".into()],
            ],
        );
        let sample = chart_sample(&table);
        assert!(sample.is_empty());
        assert_eq!(sample.column_count(), 0);
    }
}
