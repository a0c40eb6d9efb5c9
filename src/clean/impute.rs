//! Mean imputation for numeric columns

use tracing::{debug, warn};

use crate::model::{CellType, CellValue, Table};

/// Mean of the non-missing values of a column, `None` if there are none
pub fn column_mean(table: &Table, col_idx: usize) -> Option<f64> {
    let (sum, count) = table
        .column_values(col_idx)
        .filter_map(CellValue::as_f64)
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Replace missing cells of every numeric column with that column's mean.
///
/// Non-numeric columns are never touched. A numeric column without any
/// value has no mean and keeps its missing cells. Running this twice is a
/// no-op the second time.
pub fn fill_missing_with_mean(table: &mut Table) -> &mut Table {
    for col_idx in 0..table.column_count() {
        if !table.columns[col_idx].is_numeric() {
            continue;
        }

        let Some(mean) = column_mean(table, col_idx) else {
            warn!(
                column = %table.columns[col_idx].name,
                "column has no values to average; leaving missing cells"
            );
            continue;
        };

        let mut filled = 0usize;
        for row in &mut table.rows {
            if let Some(cell) = row.cells.get_mut(col_idx) {
                if cell.is_missing() {
                    *cell = CellValue::Float(mean);
                    filled += 1;
                }
            }
        }

        if filled > 0 {
            let column = &mut table.columns[col_idx];
            column.inferred_type = column.inferred_type.widen(CellType::Float);
            debug!(column = %column.name, filled, mean, "filled missing values");
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean::analyze_missing;
    use crate::model::ColumnKind;

    fn sample() -> Table {
        Table::from_rows(
            vec!["name", "age", "score", "empty"],
            vec![
                vec!["Alice".into(), CellValue::Int(30), CellValue::Float(1.0), CellValue::Null],
                vec![CellValue::Null, CellValue::Null, CellValue::Float(2.0), CellValue::Null],
                vec!["Carol".into(), CellValue::Int(40), CellValue::Null, CellValue::Null],
            ],
        )
    }

    #[test]
    fn test_fills_with_pre_fill_mean() {
        let mut table = sample();
        fill_missing_with_mean(&mut table);

        assert_eq!(table.rows[1].cells[1], CellValue::Float(35.0));
        assert_eq!(table.rows[2].cells[2], CellValue::Float(1.5));
        assert_eq!(table.columns[1].inferred_type, CellType::Float);
        assert_eq!(table.columns[1].kind, ColumnKind::Numeric);

        let report = analyze_missing(&table);
        assert_eq!(report.get("age"), Some(0));
        assert_eq!(report.get("score"), Some(0));
    }

    #[test]
    fn test_text_columns_untouched() {
        let mut table = sample();
        fill_missing_with_mean(&mut table);
        assert_eq!(table.rows[1].cells[0], CellValue::Null);
    }

    #[test]
    fn test_all_missing_column_is_skipped() {
        let mut table = sample();
        fill_missing_with_mean(&mut table);
        assert!(table.column_values(3).all(CellValue::is_null));
        assert_eq!(analyze_missing(&table).get("empty"), Some(3));
    }

    #[test]
    fn test_idempotent() {
        let mut once = sample();
        fill_missing_with_mean(&mut once);
        let mut twice = once.clone();
        fill_missing_with_mean(&mut twice);
        assert!(once.content_eq(&twice));
    }

    #[test]
    fn test_column_mean() {
        let table = sample();
        assert_eq!(column_mean(&table, 1), Some(35.0));
        assert_eq!(column_mean(&table, 3), None);
    }
}
