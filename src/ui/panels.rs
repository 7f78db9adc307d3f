use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::metrics::Metrics;
use crate::data::model::CellValue;
use crate::state::AppState;
use crate::ui::{format_total, plot, tables};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    // Widget changes are collected here and applied after drawing, each one
    // triggering a full recomputation.
    let mut toggled: Vec<(String, CellValue)> = Vec::new();
    let mut cleared: Vec<String> = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for col in &state.settings.filter_columns {
                let Some(all_values) = state.options.get(col) else {
                    continue;
                };
                let selected = state.selection.get(col);

                // Show count of selected / total in the header
                let n_selected = selected.map_or(0, BTreeSet::len);
                let n_total = all_values.len();
                let header_text = if n_selected == 0 {
                    format!("{col}  (all {n_total})")
                } else {
                    format!("{col}  ({n_selected}/{n_total})")
                };

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(col)
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        if all_values.is_empty() {
                            ui.label(RichText::new("no values").weak());
                            return;
                        }
                        if ui.small_button("Clear").clicked() {
                            cleared.push(col.clone());
                        }
                        for val in all_values {
                            let mut checked = selected.is_some_and(|s| s.contains(val));
                            if ui.checkbox(&mut checked, val.to_string()).changed() {
                                toggled.push((col.clone(), val.clone()));
                            }
                        }
                    });
            }
        });

    for col in cleared {
        state.clear_filter(&col);
    }
    for (col, val) in toggled {
        state.toggle_filter_value(&col, &val);
    }
}

// ---------------------------------------------------------------------------
// Central panel – metrics, tables and chart
// ---------------------------------------------------------------------------

/// Render the dashboard body.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view crash records  (File → Open…)");
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Air Crash Data Analysis");
            ui.add_space(8.0);

            metrics_row(ui, &state.metrics);
            ui.separator();

            tables::preview_table(ui, &state.view, state.settings.preview_rows);
            ui.separator();

            ui.strong("Year With Largest Fatalities");
            tables::ranking_table(
                ui,
                &state.settings.group_column,
                &state.settings.ranking_column,
                &state.ranking,
            );
            ui.separator();

            ui.strong(format!("Top {} Yearly Fatalities", state.settings.top_n));
            plot::ranking_chart(ui, state);
        });
}

fn metrics_row(ui: &mut Ui, metrics: &Metrics) {
    ui.columns(4, |cols: &mut [Ui]| {
        metric(&mut cols[0], "Fatalities", metrics.row_count.to_string());
        metric(&mut cols[1], "Year", format_total(metrics.year_total));
        metric(&mut cols[2], "Total Fatalities", format_total(metrics.fatalities_total));
        metric(&mut cols[3], "Aircraft", metrics.distinct_aircraft.to_string());
    });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(label).weak());
        ui.label(RichText::new(value).size(26.0).strong());
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        let loaded = state.dataset.is_some();
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.add_enabled(loaded, egui::Button::new("Reload")).clicked() {
                state.reload();
                ui.close_menu();
            }
            if ui
                .add_enabled(loaded, egui::Button::new("Export filtered CSV…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let name = ds
                .source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            ui.label(format!(
                "{name}: {} rows loaded, {} visible",
                ds.table.len(),
                state.view.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open crash records")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_from(&path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered rows")
        .set_file_name("filtered_aircrashes.csv")
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.export_view(&path);
    }
}
