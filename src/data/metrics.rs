use std::collections::BTreeMap;

use super::model::{CellValue, CrashTable};

// ---------------------------------------------------------------------------
// Headline metrics
// ---------------------------------------------------------------------------

/// Which columns feed the headline metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricColumns {
    pub year: String,
    pub fatalities: String,
    pub aircraft: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Metrics {
    pub row_count: usize,
    pub year_total: f64,
    pub fatalities_total: f64,
    pub distinct_aircraft: usize,
}

/// Sum of the numeric cells of a column. Missing cells are skipped; a column
/// with nothing to add (absent, empty or all missing) sums to `0.0`.
pub fn sum(table: &CrashTable, column: &str) -> f64 {
    // `Sum for f64` starts from -0.0, which would render as "-0".
    table
        .column(column)
        .filter_map(CellValue::as_f64)
        .fold(0.0, |acc, v| acc + v)
}

/// Number of distinct non-missing values in a column.
pub fn distinct_count(table: &CrashTable, column: &str) -> usize {
    table.unique_values(column).len()
}

pub fn aggregate(table: &CrashTable, columns: &MetricColumns) -> Metrics {
    Metrics {
        row_count: table.len(),
        year_total: sum(table, &columns.year),
        fatalities_total: sum(table, &columns.fatalities),
        distinct_aircraft: distinct_count(table, &columns.aircraft),
    }
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Sum `value_column` per distinct `group_column` value and keep the `n`
/// largest, descending. Ties go to the smaller group key.
///
/// Rows with a missing group key are left out. Empty when the table is empty
/// or either column holds nothing but missing values; a value column without
/// a single number counts as all missing.
pub fn top_n_by_group(
    table: &CrashTable,
    group_column: &str,
    value_column: &str,
    n: usize,
) -> Vec<(CellValue, f64)> {
    let (Some(g), Some(v)) = (table.column_index(group_column), table.column_index(value_column))
    else {
        return Vec::new();
    };
    if table.column(value_column).all(|v| v.as_f64().is_none()) {
        return Vec::new();
    }

    let mut totals: BTreeMap<&CellValue, f64> = BTreeMap::new();
    for row in &table.rows {
        if row[g].is_null() {
            continue;
        }
        *totals.entry(&row[g]).or_insert(0.0) += row[v].as_f64().unwrap_or(0.0);
    }

    // BTreeMap iterates keys ascending and the sort is stable.
    let mut ranked: Vec<(CellValue, f64)> = totals
        .into_iter()
        .map(|(group, total)| (group.clone(), total))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: Vec<Vec<CellValue>>) -> CrashTable {
        CrashTable::new(columns.iter().map(|c| c.to_string()).collect(), rows)
    }

    fn grouped(pairs: &[(&str, Option<f64>)]) -> CrashTable {
        table(
            &["group", "value"],
            pairs
                .iter()
                .map(|(g, v)| vec![CellValue::text(*g), v.map_or(CellValue::Null, CellValue::Float)])
                .collect(),
        )
    }

    #[test]
    fn ties_break_on_ascending_key() {
        let t = grouped(&[
            ("C", Some(30.0)),
            ("A", Some(10.0)),
            ("D", Some(5.0)),
            ("B", Some(30.0)),
        ]);
        assert_eq!(
            top_n_by_group(&t, "group", "value", 2),
            vec![(CellValue::text("B"), 30.0), (CellValue::text("C"), 30.0)]
        );
    }

    #[test]
    fn groups_are_summed_before_ranking() {
        let t = grouped(&[
            ("A", Some(10.0)),
            ("B", Some(4.0)),
            ("A", None),
            ("B", Some(4.0)),
            ("A", Some(1.5)),
        ]);
        assert_eq!(
            top_n_by_group(&t, "group", "value", 5),
            vec![(CellValue::text("A"), 11.5), (CellValue::text("B"), 8.0)]
        );
    }

    #[test]
    fn ranking_of_nothing_is_empty() {
        assert!(top_n_by_group(&grouped(&[]), "group", "value", 5).is_empty());
        assert!(top_n_by_group(&grouped(&[("A", None), ("B", None)]), "group", "value", 5).is_empty());
        assert!(top_n_by_group(&grouped(&[("A", Some(1.0))]), "group", "nope", 5).is_empty());
        let text_values = table(
            &["group", "value"],
            vec![vec![CellValue::text("A"), CellValue::text("lots")]],
        );
        assert!(top_n_by_group(&text_values, "group", "value", 5).is_empty());
        let no_groups = table(
            &["group", "value"],
            vec![vec![CellValue::Null, CellValue::Integer(3)]],
        );
        assert!(top_n_by_group(&no_groups, "group", "value", 5).is_empty());
    }

    #[test]
    fn sums_skip_missing_and_default_to_zero() {
        let t = table(
            &["year", "fatalities"],
            vec![
                vec![CellValue::Integer(1985), CellValue::Null],
                vec![CellValue::Null, CellValue::Null],
                vec![CellValue::Integer(1990), CellValue::Null],
            ],
        );
        assert_eq!(sum(&t, "year"), 3975.0);
        assert_eq!(sum(&t, "fatalities"), 0.0);
        assert_eq!(sum(&t, "absent"), 0.0);
        assert!(sum(&t, "fatalities").is_sign_positive());
        assert!(sum(&CrashTable::default(), "year").is_sign_positive());
    }

    #[test]
    fn aggregate_reports_all_metrics() {
        let t = table(
            &["year", "sum_of_fatalities_air", "aircraft"],
            vec![
                vec![CellValue::Integer(1985), CellValue::Integer(520), CellValue::text("Boeing 747")],
                vec![CellValue::Integer(1988), CellValue::Integer(259), CellValue::text("Boeing 747")],
                vec![CellValue::Integer(1990), CellValue::Null, CellValue::Null],
                vec![CellValue::Integer(1990), CellValue::Float(2.5), CellValue::text("DC-3")],
            ],
        );
        let columns = MetricColumns {
            year: "year".into(),
            fatalities: "sum_of_fatalities_air".into(),
            aircraft: "aircraft".into(),
        };
        assert_eq!(
            aggregate(&t, &columns),
            Metrics {
                row_count: 4,
                year_total: 7953.0,
                fatalities_total: 781.5,
                distinct_aircraft: 2,
            }
        );
        assert_eq!(aggregate(&CrashTable::default(), &columns), Metrics::default());
    }
}
