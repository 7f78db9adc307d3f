use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;

use super::normalize::LoadReport;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the crash table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value.
/// Used as a key in `BTreeSet` / `HashSet` downstream so `CellValue` must be
/// `Ord` and `Hash`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Date(NaiveDate),
    /// Missing value. Never stands in for zero.
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    /// Missing values first, then numbers in numeric order, then text, then
    /// dates. An integer and a float of equal value order integer first.
    fn cmp(&self, other: &Self) -> Ordering {
        use CellValue::*;
        fn rank(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Integer(_) | Float(_) => 1,
                Text(_) => 2,
                Date(_) => 3,
            }
        }
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Integer(a), Float(b)) => (*a as f64).total_cmp(b).then(Ordering::Less),
            (Float(a), Integer(b)) => a.total_cmp(&(*b as f64)).then(Ordering::Greater),
            (Text(a), Text(b)) => a.cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Date(d) => d.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Numeric view of the cell; `None` for text, dates and missing values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }
}

// ---------------------------------------------------------------------------
// CrashTable – the cleaned, in-memory table
// ---------------------------------------------------------------------------

/// Row-major table with ordered, normalized column names.
///
/// Every row holds exactly `columns.len()` cells. Tables are never mutated
/// after loading; filtering produces an independent copy.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CrashTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl CrashTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        CrashTable { columns, rows }
    }

    /// Position of the first column with this name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cells of one column in row order; empty if the column is absent.
    pub fn column<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a CellValue> + 'a {
        let idx = self.column_index(name);
        self.rows
            .iter()
            .filter_map(move |row| idx.map(|i| &row[i]))
    }

    /// Sorted distinct non-missing values of a column.
    pub fn unique_values(&self, name: &str) -> BTreeSet<CellValue> {
        self.column(name)
            .filter(|v| !v.is_null())
            .cloned()
            .collect()
    }

    /// Independent copy holding only the given rows, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> CrashTable {
        CrashTable {
            columns: self.columns.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> &[Vec<CellValue>] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Dataset – a cleaned table plus where it came from
// ---------------------------------------------------------------------------

/// A loaded source. The table is shared read-only; a reload replaces the
/// whole `Dataset` rather than touching the table.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub table: Arc<CrashTable>,
    pub source: PathBuf,
    pub report: LoadReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CrashTable {
        CrashTable::new(
            vec!["year".into(), "aircraft".into()],
            vec![
                vec![CellValue::Integer(1985), CellValue::text("Boeing 747")],
                vec![CellValue::Null, CellValue::text("DC-3")],
                vec![CellValue::Integer(1985), CellValue::text("DC-3")],
            ],
        )
    }

    #[test]
    fn ordering_groups_by_kind_then_value() {
        let mut values = vec![
            CellValue::text("b"),
            CellValue::Float(1.5),
            CellValue::Integer(3),
            CellValue::Null,
            CellValue::text("a"),
            CellValue::Integer(-1),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                CellValue::Null,
                CellValue::Integer(-1),
                CellValue::Float(1.5),
                CellValue::Integer(3),
                CellValue::text("a"),
                CellValue::text("b"),
            ]
        );
    }

    #[test]
    fn mixed_numbers_sort_numerically() {
        let years: BTreeSet<CellValue> = [
            CellValue::Integer(1990),
            CellValue::Float(1985.5),
            CellValue::Integer(1985),
            CellValue::Float(1985.0),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            years.into_iter().collect::<Vec<_>>(),
            vec![
                CellValue::Integer(1985),
                CellValue::Float(1985.0),
                CellValue::Float(1985.5),
                CellValue::Integer(1990),
            ]
        );
    }

    #[test]
    fn unique_values_skip_missing() {
        let table = sample();
        let years = table.unique_values("year");
        assert_eq!(years.len(), 1);
        assert!(years.contains(&CellValue::Integer(1985)));
        assert!(table.unique_values("nope").is_empty());
    }

    #[test]
    fn select_rows_copies_requested_rows() {
        let table = sample();
        let picked = table.select_rows(&[2, 0]);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked.rows[0][1], CellValue::text("DC-3"));
        assert_eq!(picked.rows[1][1], CellValue::text("Boeing 747"));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn head_is_clamped() {
        let table = sample();
        assert_eq!(table.head(2).len(), 2);
        assert_eq!(table.head(10).len(), 3);
    }

    #[test]
    fn display_formats() {
        let date = NaiveDate::from_ymd_opt(1985, 7, 1).unwrap();
        assert_eq!(CellValue::Date(date).to_string(), "1985-07-01");
        assert_eq!(CellValue::Float(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Null.to_string(), "<null>");
    }
}
