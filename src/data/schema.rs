//! Declared shape of the crash table: which columns the pipeline expects,
//! what each falls back to when absent, and the fixed vocabularies used to
//! derive month and period columns.

/// How an expected column is cleaned, and what fills it when the source
/// leaves it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    /// Free text; missing cells become [`UNKNOWN`].
    Category,
    /// Coerced to a number; unparseable cells become missing.
    Numeric,
    /// Kept as text; missing stays missing.
    Text,
}

#[derive(Debug, Clone, Copy)]
pub struct ExpectedColumn {
    pub name: &'static str,
    pub role: ColumnRole,
}

const fn expected(name: &'static str, role: ColumnRole) -> ExpectedColumn {
    ExpectedColumn { name, role }
}

/// Placeholder for missing categorical values.
pub const UNKNOWN: &str = "Unknown";

/// Columns the pipeline relies on, by normalized name. A column missing from
/// the source is synthesized with its role's fallback.
pub const EXPECTED_COLUMNS: &[ExpectedColumn] = &[
    expected("country_region", ColumnRole::Category),
    expected("operator", ColumnRole::Category),
    expected("aircraft_manufacturer", ColumnRole::Category),
    expected("year", ColumnRole::Numeric),
    expected("day", ColumnRole::Numeric),
    expected("abroad", ColumnRole::Numeric),
    expected("fatalities_air", ColumnRole::Numeric),
    expected("ground", ColumnRole::Numeric),
    expected("month", ColumnRole::Text),
];

// Derived columns, appended in this order.
pub const MONTH_NUM: &str = "month_num";
pub const MONTH_DATE: &str = "month_date";
pub const MONTH_NAME: &str = "month_name";
pub const YEAR_BIN: &str = "year_bin";

pub const YEAR: &str = "year";
pub const MONTH: &str = "month";

/// Cell texts read as missing, in addition to blank cells.
pub const MISSING_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Canonical month names, matched case-sensitively.
pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Historical misspelling still present in some exports.
pub const FEBRUARY_LEGACY: &str = "Feburary";

/// Period bucket edges. Bucket `i` covers `[edge[i], edge[i + 1])`; the last
/// bucket also includes its upper edge.
pub const YEAR_BIN_EDGES: [i64; 12] = [
    1908, 1920, 1932, 1944, 1956, 1968, 1980, 1992, 2004, 2016, 2020, 2024,
];

pub const YEAR_BIN_LABELS: [&str; 11] = [
    "Early 1910s",
    "Mid 1920s",
    "Late 1930s",
    "Early 1940s",
    "Mid 1950s",
    "Late 1960s",
    "Early 1970s",
    "Late 1980s",
    "Early 2000s",
    "Mid 2010s",
    "Early 2020s",
];
