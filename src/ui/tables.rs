use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{CellValue, CrashTable};
use crate::ui::format_total;

const ROW_HEIGHT: f32 = 18.0;

/// First `rows` rows of the filtered view, every column.
pub fn preview_table(ui: &mut Ui, table: &CrashTable, rows: usize) {
    if table.is_empty() {
        ui.label(RichText::new("No rows match the current filters.").weak());
        return;
    }

    ui.push_id("preview_table", |ui: &mut Ui| {
        ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .columns(Column::auto().at_least(60.0), table.columns.len())
                .header(ROW_HEIGHT + 4.0, |mut header| {
                    for name in &table.columns {
                        header.col(|ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|mut body| {
                    for row in table.head(rows) {
                        body.row(ROW_HEIGHT, |mut cells| {
                            for value in row {
                                cells.col(|ui| {
                                    ui.label(value.to_string());
                                });
                            }
                        });
                    }
                });
        });
    });
}

/// The ranking as a two-column table: group, summed value.
pub fn ranking_table(ui: &mut Ui, group_column: &str, value_column: &str, ranking: &[(CellValue, f64)]) {
    if ranking.is_empty() {
        ui.label(RichText::new("Nothing to rank.").weak());
        return;
    }

    ui.push_id("ranking_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(Column::initial(120.0).at_least(80.0))
            .column(Column::remainder())
            .header(ROW_HEIGHT + 4.0, |mut header| {
                header.col(|ui| {
                    ui.strong(group_column);
                });
                header.col(|ui| {
                    ui.strong(value_column);
                });
            })
            .body(|mut body| {
                for (group, total) in ranking {
                    body.row(ROW_HEIGHT, |mut cells| {
                        cells.col(|ui| {
                            ui.label(group.to_string());
                        });
                        cells.col(|ui| {
                            ui.label(format_total(*total));
                        });
                    });
                }
            });
    });
}
