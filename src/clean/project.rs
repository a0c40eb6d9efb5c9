//! Column projection

use rustc_hash::FxHashSet;

use crate::error::{Error, Result};
use crate::model::Table;

/// Keep only the named columns, in their original table order.
///
/// The order of `keep` is irrelevant and duplicates are ignored. Fails on the
/// first name the table does not have; the input table is never modified.
pub fn project_columns<S: AsRef<str>>(table: &Table, keep: &[S]) -> Result<Table> {
    let mut wanted: FxHashSet<&str> = FxHashSet::default();
    for name in keep {
        let name = name.as_ref();
        if table.column_index(name).is_none() {
            return Err(Error::UnknownColumn {
                name: name.to_string(),
            });
        }
        wanted.insert(name);
    }

    let indices: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .filter(|(_, col)| wanted.contains(col.name.as_str()))
        .map(|(idx, _)| idx)
        .collect();

    Ok(table.select_indices(&indices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellValue;

    fn sample() -> Table {
        Table::from_rows(
            vec!["id", "name", "age"],
            vec![
                vec![CellValue::Int(1), "Alice".into(), CellValue::Int(30)],
                vec![CellValue::Int(2), "Bob".into(), CellValue::Null],
            ],
        )
    }

    #[test]
    fn test_keeps_original_order() {
        let table = sample();
        let projected = project_columns(&table, &["age", "id"]).unwrap();
        assert_eq!(projected.column_names(), vec!["id", "age"]);
        assert_eq!(projected.rows[0].cells, vec![CellValue::Int(1), CellValue::Int(30)]);
        assert_eq!(projected.row_count(), 2);
    }

    #[test]
    fn test_full_set_is_content_equal() {
        let table = sample();
        let names: Vec<String> = table.column_names().iter().map(|s| s.to_string()).collect();
        let projected = project_columns(&table, names.as_slice()).unwrap();
        assert!(projected.content_eq(&table));
    }

    #[test]
    fn test_unknown_column_fails_and_leaves_input() {
        let table = sample();
        let before = table.clone();
        let err = project_columns(&table, &["name", "salary"]).unwrap_err();
        assert_eq!(
            err,
            Error::UnknownColumn {
                name: "salary".to_string()
            }
        );
        assert!(table.content_eq(&before));
    }

    #[test]
    fn test_types_carried_over() {
        let table = sample();
        let projected = project_columns(&table, &["age"]).unwrap();
        assert_eq!(projected.columns[0], table.columns[2]);
    }
}
