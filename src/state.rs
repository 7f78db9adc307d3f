use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::color::ColorMap;
use crate::config::Settings;
use crate::data::export::write_csv;
use crate::data::filter::{FilterSelection, filter, filter_options};
use crate::data::loader::load_file;
use crate::data::metrics::{Metrics, aggregate, top_n_by_group};
use crate::data::model::{CellValue, CrashTable, Dataset};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub settings: Settings,

    /// Loaded dataset (None until a file loads). Replaced whole on reload.
    pub dataset: Option<Dataset>,

    /// Selectable values per filter column.
    pub options: BTreeMap<String, BTreeSet<CellValue>>,

    /// Per-column filter selections.
    pub selection: FilterSelection,

    /// Rows passing the current selection.
    pub view: CrashTable,

    pub metrics: Metrics,

    /// Top groups of the current view, largest first.
    pub ranking: Vec<(CellValue, f64)>,

    /// Colours of the ranking bars.
    pub color_map: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            dataset: None,
            options: BTreeMap::new(),
            selection: FilterSelection::new(),
            view: CrashTable::default(),
            metrics: Metrics::default(),
            ranking: Vec::new(),
            color_map: ColorMap::default(),
            status_message: None,
        }
    }

    /// Load the configured dataset at startup. A failure leaves the app
    /// running with no dataset and says so in the status line.
    pub fn load_startup(&mut self) {
        let path = self.settings.data_path.clone();
        if let Err(e) = self.try_load(&path) {
            log::error!("Startup load of {} failed: {e:#}", path.display());
            self.status_message = Some(format!(
                "Startup load failed, no dataset open: {}: {e:#}",
                path.display()
            ));
        }
    }

    /// Load a file and make it the current dataset. On failure the previous
    /// dataset (if any) stays in place and the error goes to the status line.
    pub fn load_from(&mut self, path: &Path) {
        if let Err(e) = self.try_load(path) {
            log::error!("Failed to load {}: {e:#}", path.display());
            self.status_message = Some(format!("Error: {e:#}"));
        }
    }

    fn try_load(&mut self, path: &Path) -> anyhow::Result<()> {
        let dataset = load_file(path, &self.settings.numeric_columns())?;
        self.set_dataset(dataset);
        Ok(())
    }

    /// Re-read the current dataset's source.
    pub fn reload(&mut self) {
        if let Some(source) = self.dataset.as_ref().map(|ds| ds.source.clone()) {
            self.load_from(&source);
        }
    }

    /// Ingest a newly loaded dataset, reset filters and recompute everything.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.options = filter_options(&dataset.table, &self.settings.filter_columns);
        self.selection = FilterSelection::new();
        self.color_map = ColorMap::new(&dataset.table.unique_values(&self.settings.group_column));
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refresh();
    }

    /// Recompute view, metrics and ranking from scratch.
    pub fn refresh(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        self.view = filter(&ds.table, &self.selection);
        self.metrics = aggregate(&self.view, &self.settings.metric_columns());
        self.ranking = top_n_by_group(
            &self.view,
            &self.settings.group_column,
            &self.settings.ranking_column,
            self.settings.top_n,
        );
        log::debug!(
            "refreshed: {} of {} rows visible, {} ranked groups",
            self.view.len(),
            ds.table.len(),
            self.ranking.len()
        );
    }

    /// Toggle a single value in a column's selection.
    pub fn toggle_filter_value(&mut self, column: &str, value: &CellValue) {
        let selected = self.selection.entry(column.to_string()).or_default();
        if !selected.remove(value) {
            selected.insert(value.clone());
        }
        self.refresh();
    }

    /// Drop every constraint on a column.
    pub fn clear_filter(&mut self, column: &str) {
        self.selection.remove(column);
        self.refresh();
    }

    /// Write the current view as CSV.
    pub fn export_view(&mut self, path: &Path) {
        match write_csv(&self.view, path) {
            Ok(()) => {
                log::info!("Exported {} rows to {}", self.view.len(), path.display());
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
