use eframe::egui::{RichText, Ui};
use egui_plot::{Bar, BarChart, Plot};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Ranking chart (central panel)
// ---------------------------------------------------------------------------

/// Horizontal bars, largest group on top, one colour per group.
pub fn ranking_chart(ui: &mut Ui, state: &AppState) {
    if state.ranking.is_empty() {
        ui.label(RichText::new("Nothing to rank.").weak());
        return;
    }

    let n = state.ranking.len();
    let labels: Vec<String> = state
        .ranking
        .iter()
        .rev()
        .map(|(group, _)| group.to_string())
        .collect();

    let bars: Vec<Bar> = state
        .ranking
        .iter()
        .enumerate()
        .map(|(rank, (group, total))| {
            Bar::new((n - 1 - rank) as f64, *total)
                .name(group.to_string())
                .fill(state.color_map.color_for(group))
                .width(0.7)
        })
        .collect();

    Plot::new("ranking_chart")
        .height(300.0)
        .x_axis_label(state.settings.ranking_column.clone())
        .y_axis_label(state.settings.group_column.clone())
        .y_axis_formatter(move |mark, _range| {
            let pos = mark.value.round();
            if (mark.value - pos).abs() > f64::EPSILON || pos < 0.0 {
                return String::new();
            }
            labels.get(pos as usize).cloned().unwrap_or_default()
        })
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
        });
}
