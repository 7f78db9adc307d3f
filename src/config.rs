use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::metrics::MetricColumns;
use crate::data::normalize::normalize_column_name;

/// Environment variable naming a settings file.
pub const CONFIG_ENV: &str = "AIRCRASH_DASH_CONFIG";
/// Settings file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "aircrash-dash.json";

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Dashboard settings. Column names may be given in either the source's
/// spelling (`"Total Fatalities"`) or the normalized one (`"total_fatalities"`);
/// they are normalized on load.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Dataset loaded at startup.
    pub data_path: PathBuf,
    /// Sidebar multiselects, in display order.
    pub filter_columns: Vec<String>,
    /// Length of the ranking.
    pub top_n: usize,
    /// Rows shown in the preview table.
    pub preview_rows: usize,
    /// Grouping column of the ranking chart.
    pub group_column: String,
    /// Summed per group for the ranking chart.
    pub ranking_column: String,
    pub year_column: String,
    pub fatalities_column: String,
    pub aircraft_column: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("aircrashesFullData.csv"),
            filter_columns: vec!["year".into(), "quarter".into(), "month".into()],
            top_n: 5,
            preview_rows: 5,
            group_column: "year".into(),
            ranking_column: "total_fatalities".into(),
            year_column: "year".into(),
            fatalities_column: "sum_of_fatalities_air".into(),
            aircraft_column: "aircraft".into(),
        }
    }
}

impl Settings {
    /// Resolve settings for this process: the file named by
    /// [`CONFIG_ENV`], else [`DEFAULT_CONFIG_FILE`] if it exists, else the
    /// defaults. `data_override` (the first CLI argument) wins over the file.
    pub fn load(data_override: Option<PathBuf>) -> Result<Self> {
        let mut settings = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        if let Some(path) = data_override {
            settings.data_path = path;
        }
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&text)
            .with_context(|| format!("parsing settings {}", path.display()))?;
        log::info!("Using settings from {}", path.display());
        Ok(settings.normalized())
    }

    /// Bring every column reference to the normalized spelling.
    pub fn normalized(mut self) -> Self {
        for col in &mut self.filter_columns {
            *col = normalize_column_name(col);
        }
        for col in [
            &mut self.group_column,
            &mut self.ranking_column,
            &mut self.year_column,
            &mut self.fatalities_column,
            &mut self.aircraft_column,
        ] {
            *col = normalize_column_name(col);
        }
        self
    }

    /// Columns that get summed, so they must be read as numbers cell by cell.
    pub fn numeric_columns(&self) -> Vec<String> {
        let mut columns = vec![
            self.year_column.clone(),
            self.fatalities_column.clone(),
            self.ranking_column.clone(),
        ];
        columns.dedup();
        columns
    }

    pub fn metric_columns(&self) -> MetricColumns {
        MetricColumns {
            year: self.year_column.clone(),
            fatalities: self.fatalities_column.clone(),
            aircraft: self.aircraft_column.clone(),
        }
    }
}
