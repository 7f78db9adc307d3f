use std::collections::{BTreeMap, BTreeSet};

use super::model::{CellValue, CrashTable};

// ---------------------------------------------------------------------------
// Filter predicate: which values are accepted per column
// ---------------------------------------------------------------------------

/// Per-column selection: maps column_name → set of accepted values.
/// If a column is absent or its set is empty, it means "no constraint".
pub type FilterSelection = BTreeMap<String, BTreeSet<CellValue>>;

/// Selectable values for each filter column, in display order.
pub fn filter_options(table: &CrashTable, columns: &[String]) -> BTreeMap<String, BTreeSet<CellValue>> {
    columns
        .iter()
        .map(|col| (col.clone(), table.unique_values(col)))
        .collect()
}

/// Return indices of rows that pass every active constraint.
///
/// A row passes a column constraint when:
/// * The selected set for that column is empty → no constraint
/// * The row's value for that column is in the selected set
///
/// A constrained column the table doesn't have reads as `Null` in every row.
pub fn filtered_indices(table: &CrashTable, selection: &FilterSelection) -> Vec<usize> {
    let active: Vec<(Option<usize>, &BTreeSet<CellValue>)> = selection
        .iter()
        .filter(|(_, accepted)| !accepted.is_empty())
        .map(|(col, accepted)| (table.column_index(col), accepted))
        .collect();

    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            active.iter().all(|(idx, accepted)| match idx {
                Some(i) => accepted.contains(&row[*i]),
                None => accepted.contains(&CellValue::Null),
            })
        })
        .map(|(i, _)| i)
        .collect()
}

/// The rows matching `selection`, as an independent table. With no active
/// constraint this is a plain copy of `table`.
pub fn filter(table: &CrashTable, selection: &FilterSelection) -> CrashTable {
    if selection.values().all(BTreeSet::is_empty) {
        return table.clone();
    }
    table.select_rows(&filtered_indices(table, selection))
}
