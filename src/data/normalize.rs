use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;

use super::model::{CellValue, CrashTable};
use super::schema::{
    ColumnRole, EXPECTED_COLUMNS, FEBRUARY_LEGACY, MISSING_TOKENS, MONTH, MONTHS, MONTH_DATE,
    MONTH_NAME, MONTH_NUM, UNKNOWN, YEAR, YEAR_BIN, YEAR_BIN_EDGES, YEAR_BIN_LABELS,
};

// ---------------------------------------------------------------------------
// Raw input and load diagnostics
// ---------------------------------------------------------------------------

/// Text cells exactly as read from a source, before any cleaning.
/// Every row has `headers.len()` cells; `None` is a cell the source left empty.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

/// What the cleaning pass absorbed. Per-cell problems are only ever counted
/// here, never raised.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub rows_read: usize,
    pub ragged_rows: usize,
    pub duplicates_removed: usize,
    pub unparseable_numbers: usize,
    pub unmapped_months: usize,
    pub out_of_range_years: usize,
    pub filled_categories: usize,
    /// Expected columns the source did not provide.
    pub synthesized_columns: Vec<String>,
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows read, {} duplicates removed, {} unparseable numbers, \
             {} unmapped months, {} years outside the period bins, {} categories filled",
            self.rows_read,
            self.duplicates_removed,
            self.unparseable_numbers,
            self.unmapped_months,
            self.out_of_range_years,
            self.filled_categories,
        )?;
        if self.ragged_rows > 0 {
            write!(f, ", {} ragged rows", self.ragged_rows)?;
        }
        if !self.synthesized_columns.is_empty() {
            write!(f, ", synthesized {:?}", self.synthesized_columns)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Per-value rules
// ---------------------------------------------------------------------------

/// `" Fatalities (air) "` → `"fatalities_air"`, `"Country/Region"` → `"country_region"`.
pub fn normalize_column_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace(' ', "_")
        .replace(['(', ')'], "")
        .replace('/', "_")
}

/// Whether a raw cell counts as missing.
pub fn is_missing(s: &str) -> bool {
    let trimmed = s.trim();
    trimmed.is_empty() || MISSING_TOKENS.contains(&trimmed)
}

/// Parse a numeric cell. Anything that isn't a finite number is `Null`.
pub fn coerce_numeric(text: Option<&str>) -> CellValue {
    let Some(s) = text.map(str::trim).filter(|s| !s.is_empty()) else {
        return CellValue::Null;
    };
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => {
            if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
                CellValue::Integer(v as i64)
            } else {
                CellValue::Float(v)
            }
        }
        _ => CellValue::Null,
    }
}

/// Type a column the schema knows nothing about: numeric if every present
/// cell parses as a number, text otherwise.
pub fn infer_passthrough(cells: &[Option<&str>]) -> Vec<CellValue> {
    let numeric = cells
        .iter()
        .flatten()
        .all(|s| !coerce_numeric(Some(*s)).is_null());
    cells
        .iter()
        .map(|cell| match cell {
            None => CellValue::Null,
            Some(s) if numeric => coerce_numeric(Some(*s)),
            Some(s) => CellValue::text(*s),
        })
        .collect()
}

/// Case-sensitive month lookup, `"July"` → 7.
pub fn month_number(name: &str) -> Option<u32> {
    if name == FEBRUARY_LEGACY {
        return Some(2);
    }
    MONTHS
        .iter()
        .position(|m| *m == name)
        .map(|i| i as u32 + 1)
}

/// First day of the given month, if both parts are known and valid.
pub fn month_date(year: Option<i64>, month: Option<u32>) -> Option<NaiveDate> {
    let year = i32::try_from(year?).ok()?;
    NaiveDate::from_ymd_opt(year, month?, 1)
}

pub fn month_name(date: NaiveDate) -> String {
    date.format("%B").to_string()
}

/// Period label for a year, `None` outside `[1908, 2024]`.
pub fn year_bin(year: f64) -> Option<&'static str> {
    let first = YEAR_BIN_EDGES[0] as f64;
    let last = YEAR_BIN_EDGES[YEAR_BIN_EDGES.len() - 1] as f64;
    if !year.is_finite() || year < first || year > last {
        return None;
    }
    let bucket = YEAR_BIN_EDGES[1..]
        .iter()
        .position(|&upper| year < upper as f64)
        .unwrap_or(YEAR_BIN_LABELS.len() - 1);
    Some(YEAR_BIN_LABELS[bucket])
}

// ---------------------------------------------------------------------------
// Whole-table pass
// ---------------------------------------------------------------------------

/// Clean a raw table: normalize names, apply the schema, derive the month and
/// period columns, then drop exact duplicate rows.
///
/// `numeric_columns` names extra columns (already normalized) that are
/// coerced cell by cell like the schema's numeric columns, so one junk cell
/// in a summed column is missing rather than turning the column into text.
/// Columns the schema already types keep their schema role.
pub fn normalize(raw: RawTable, numeric_columns: &[String]) -> (CrashTable, LoadReport) {
    let mut report = LoadReport {
        rows_read: raw.rows.len(),
        ..Default::default()
    };

    let mut names: Vec<String> = raw.headers.iter().map(|h| normalize_column_name(h)).collect();

    // Column-major view of the raw cells with missing markers already folded to `None`.
    let raw_columns: Vec<Vec<Option<&str>>> = (0..names.len())
        .map(|c| {
            raw.rows
                .iter()
                .map(|row| {
                    row.get(c)
                        .and_then(|cell| cell.as_deref())
                        .filter(|s| !is_missing(s))
                })
                .collect()
        })
        .collect();

    let mut columns: Vec<Vec<CellValue>> = Vec::with_capacity(names.len() + EXPECTED_COLUMNS.len());
    let mut seen_names = HashSet::new();
    for (name, cells) in names.iter().zip(&raw_columns) {
        let first = seen_names.insert(name.as_str());
        if !first {
            log::warn!("column '{name}' appears more than once; only the first is cleaned");
        }
        let role = EXPECTED_COLUMNS
            .iter()
            .find(|e| first && e.name == name.as_str())
            .map(|e| e.role)
            .or_else(|| {
                (first && numeric_columns.iter().any(|c| c == name)).then_some(ColumnRole::Numeric)
            });
        columns.push(match role {
            Some(role) => clean_expected(role, cells, &mut report),
            None => infer_passthrough(cells),
        });
    }

    for expected in EXPECTED_COLUMNS {
        if names.iter().any(|n| n == expected.name) {
            continue;
        }
        let fallback = match expected.role {
            ColumnRole::Category => CellValue::text(UNKNOWN),
            ColumnRole::Numeric | ColumnRole::Text => CellValue::Null,
        };
        report.synthesized_columns.push(expected.name.to_string());
        names.push(expected.name.to_string());
        columns.push(vec![fallback; report.rows_read]);
    }

    // Both exist now, synthesized if necessary.
    let year_idx = names.iter().position(|n| n == YEAR).unwrap_or_default();
    let month_idx = names.iter().position(|n| n == MONTH).unwrap_or_default();

    let mut month_nums = Vec::with_capacity(report.rows_read);
    let mut month_dates = Vec::with_capacity(report.rows_read);
    let mut month_names = Vec::with_capacity(report.rows_read);
    let mut year_bins = Vec::with_capacity(report.rows_read);
    for row in 0..report.rows_read {
        let year = &columns[year_idx][row];
        let num = match &columns[month_idx][row] {
            CellValue::Text(name) => {
                let num = month_number(name);
                if num.is_none() {
                    report.unmapped_months += 1;
                }
                num
            }
            _ => None,
        };
        let date = month_date(year.as_i64(), num);
        let bin = year.as_f64().and_then(|y| {
            let bin = year_bin(y);
            if bin.is_none() {
                report.out_of_range_years += 1;
            }
            bin
        });

        month_nums.push(num.map_or(CellValue::Null, |n| CellValue::Integer(i64::from(n))));
        month_dates.push(date.map_or(CellValue::Null, CellValue::Date));
        month_names.push(date.map_or(CellValue::Null, |d| CellValue::Text(month_name(d))));
        year_bins.push(bin.map_or(CellValue::Null, CellValue::text));
    }
    for (name, column) in [
        (MONTH_NUM, month_nums),
        (MONTH_DATE, month_dates),
        (MONTH_NAME, month_names),
        (YEAR_BIN, year_bins),
    ] {
        names.push(name.to_string());
        columns.push(column);
    }

    let mut rows: Vec<Vec<CellValue>> = (0..report.rows_read)
        .map(|r| columns.iter().map(|col| col[r].clone()).collect())
        .collect();

    let mut seen = HashSet::with_capacity(rows.len());
    rows.retain(|row| seen.insert(row.clone()));
    report.duplicates_removed = report.rows_read - rows.len();

    (CrashTable::new(names, rows), report)
}

fn clean_expected(role: ColumnRole, cells: &[Option<&str>], report: &mut LoadReport) -> Vec<CellValue> {
    cells
        .iter()
        .map(|cell| match role {
            ColumnRole::Category => match cell {
                Some(s) => CellValue::text(*s),
                None => {
                    report.filled_categories += 1;
                    CellValue::text(UNKNOWN)
                }
            },
            ColumnRole::Numeric => {
                let value = coerce_numeric(*cell);
                if cell.is_some() && value.is_null() {
                    report.unparseable_numbers += 1;
                }
                value
            }
            ColumnRole::Text => cell.map_or(CellValue::Null, CellValue::text),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| Some(c.to_string())).collect())
                .collect(),
        }
    }

    fn normalize_all(raw: RawTable) -> (CrashTable, LoadReport) {
        normalize(raw, &[])
    }

    fn cell<'a>(table: &'a CrashTable, row: usize, column: &str) -> &'a CellValue {
        &table.rows[row][table.column_index(column).expect("column exists")]
    }

    #[test]
    fn column_names_are_normalized_in_place() {
        assert_eq!(normalize_column_name(" Country/Region "), "country_region");
        assert_eq!(normalize_column_name("Fatalities (air)"), "fatalities_air");
        assert_eq!(
            normalize_column_name("Sum of Fatalities (air)"),
            "sum_of_fatalities_air"
        );
        assert_eq!(normalize_column_name("Total Fatalities"), "total_fatalities");

        let (table, _) = normalize_all(raw(&["Year", "Aircraft", "Month"], &[]));
        assert_eq!(&table.columns[..3], &["year", "aircraft", "month"]);
    }

    #[test]
    fn numeric_coercion_degrades_to_missing() {
        assert_eq!(coerce_numeric(Some("37")), CellValue::Integer(37));
        assert_eq!(coerce_numeric(Some(" 1985.0 ")), CellValue::Integer(1985));
        assert_eq!(coerce_numeric(Some("2.5")), CellValue::Float(2.5));
        assert_eq!(coerce_numeric(Some("abc")), CellValue::Null);
        assert_eq!(coerce_numeric(Some("inf")), CellValue::Null);
        assert_eq!(coerce_numeric(None), CellValue::Null);
    }

    #[test]
    fn unparseable_year_is_missing_not_zero() {
        let (table, report) = normalize_all(raw(&["Year"], &[&["abc"], &["37"]]));
        assert_eq!(cell(&table, 0, "year"), &CellValue::Null);
        assert_eq!(cell(&table, 1, "year"), &CellValue::Integer(37));
        assert_eq!(report.unparseable_numbers, 1);
    }

    #[test]
    fn month_mapping() {
        assert_eq!(month_number("July"), Some(7));
        assert_eq!(month_number("February"), Some(2));
        assert_eq!(month_number("Feburary"), Some(2));
        assert_eq!(month_number("Smarch"), None);
        assert_eq!(month_number("july"), None);
    }

    #[test]
    fn derived_month_columns() {
        let (table, report) = normalize_all(raw(
            &["Year", "Month"],
            &[&["1985", "July"], &["1985", "Smarch"], &["abc", "May"]],
        ));
        let july = NaiveDate::from_ymd_opt(1985, 7, 1).unwrap();
        assert_eq!(cell(&table, 0, "month_num"), &CellValue::Integer(7));
        assert_eq!(cell(&table, 0, "month_date"), &CellValue::Date(july));
        assert_eq!(cell(&table, 0, "month_name"), &CellValue::text("July"));

        assert_eq!(cell(&table, 1, "month_num"), &CellValue::Null);
        assert_eq!(cell(&table, 1, "month_date"), &CellValue::Null);
        assert_eq!(cell(&table, 1, "month_name"), &CellValue::Null);

        assert_eq!(cell(&table, 2, "month_num"), &CellValue::Integer(5));
        assert_eq!(cell(&table, 2, "month_date"), &CellValue::Null);
        assert_eq!(report.unmapped_months, 1);
    }

    #[test]
    fn decade_bins() {
        assert_eq!(year_bin(1908.0), Some("Early 1910s"));
        assert_eq!(year_bin(1919.0), Some("Early 1910s"));
        assert_eq!(year_bin(1920.0), Some("Mid 1920s"));
        assert_eq!(year_bin(2019.0), Some("Mid 2010s"));
        assert_eq!(year_bin(2024.0), Some("Early 2020s"));
        assert_eq!(year_bin(2025.0), None);
        assert_eq!(year_bin(1907.0), None);
    }

    #[test]
    fn out_of_range_year_keeps_row_unlabeled() {
        let (table, report) = normalize_all(raw(&["Year"], &[&["2025"], &["1950"]]));
        assert_eq!(table.len(), 2);
        assert_eq!(cell(&table, 0, "year_bin"), &CellValue::Null);
        assert_eq!(cell(&table, 1, "year_bin"), &CellValue::text("Early 1940s"));
        assert_eq!(report.out_of_range_years, 1);
    }

    #[test]
    fn categories_are_filled_and_synthesized() {
        let (table, report) = normalize_all(raw(
            &["Country/Region", "Operator"],
            &[&["", "Aeroflot"], &["NA", "  "], &["Peru", "Faucett"]],
        ));
        for row in 0..table.len() {
            for column in ["country_region", "operator", "aircraft_manufacturer"] {
                assert!(matches!(cell(&table, row, column), CellValue::Text(s) if !s.is_empty()));
            }
        }
        assert_eq!(cell(&table, 0, "country_region"), &CellValue::text("Unknown"));
        assert_eq!(cell(&table, 1, "operator"), &CellValue::text("Unknown"));
        assert_eq!(cell(&table, 2, "operator"), &CellValue::text("Faucett"));
        assert_eq!(cell(&table, 2, "aircraft_manufacturer"), &CellValue::text("Unknown"));
        assert!(report
            .synthesized_columns
            .contains(&"aircraft_manufacturer".to_string()));
        assert_eq!(report.filled_categories, 3);
    }

    #[test]
    fn absent_numeric_columns_are_all_missing() {
        let (table, report) = normalize_all(raw(&["Aircraft"], &[&["DC-3"]]));
        for column in ["year", "day", "abroad", "fatalities_air", "ground"] {
            assert_eq!(cell(&table, 0, column), &CellValue::Null);
        }
        assert_eq!(cell(&table, 0, "year_bin"), &CellValue::Null);
        assert_eq!(report.out_of_range_years, 0);
    }

    #[test]
    fn exact_duplicates_are_dropped_keeping_first() {
        let (table, report) = normalize_all(raw(
            &["Year", "Aircraft"],
            &[
                &["1985", "B747"],
                &["1990", "DC-3"],
                &["1985", "B747"],
                &["1985", "B747"],
                &["1985", "B737"],
            ],
        ));
        assert_eq!(table.len(), 3);
        assert_eq!(cell(&table, 0, "aircraft"), &CellValue::text("B747"));
        assert_eq!(cell(&table, 1, "aircraft"), &CellValue::text("DC-3"));
        assert_eq!(cell(&table, 2, "aircraft"), &CellValue::text("B737"));
        assert_eq!(report.duplicates_removed, 2);
    }

    #[test]
    fn passthrough_columns_are_typed_per_column() {
        let (table, _) = normalize_all(raw(
            &["Quarter", "Total Fatalities"],
            &[&["Qtr 1", "12"], &["2", ""], &["Qtr 3", "4.5"]],
        ));
        assert_eq!(cell(&table, 1, "quarter"), &CellValue::text("2"));
        assert_eq!(cell(&table, 0, "total_fatalities"), &CellValue::Integer(12));
        assert_eq!(cell(&table, 1, "total_fatalities"), &CellValue::Null);
        assert_eq!(cell(&table, 2, "total_fatalities"), &CellValue::Float(4.5));
    }

    #[test]
    fn configured_numeric_columns_are_coerced_per_cell() {
        let numeric = vec!["total_fatalities".to_string(), "aircraft".to_string()];
        let (table, report) = normalize(
            raw(
                &["Aircraft", "Total Fatalities", "Notes"],
                &[
                    &["B747", "520", "x"],
                    &["DC-3", "unknown", "x"],
                    &["A300", "290", "x"],
                ],
            ),
            &numeric,
        );
        assert_eq!(cell(&table, 0, "total_fatalities"), &CellValue::Integer(520));
        assert_eq!(cell(&table, 1, "total_fatalities"), &CellValue::Null);
        assert_eq!(cell(&table, 2, "total_fatalities"), &CellValue::Integer(290));
        // The schema role wins over the extra list.
        assert_eq!(cell(&table, 1, "aircraft"), &CellValue::text("DC-3"));
        assert_eq!(report.unparseable_numbers, 1);

        let (untyped, _) = normalize_all(raw(
            &["Total Fatalities"],
            &[&["520"], &["unknown"]],
        ));
        assert_eq!(cell(&untyped, 0, "total_fatalities"), &CellValue::text("520"));
    }

    #[test]
    fn normalization_is_deterministic() {
        let source = raw(
            &["Year", "Month", "Operator"],
            &[&["1985", "July", ""], &["x", "Smarch", "KLM"], &["1985", "July", ""]],
        );
        assert_eq!(normalize_all(source.clone()), normalize_all(source));
    }
}
