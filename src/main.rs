mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::Context;
use app::CrashDashApp;
use config::Settings;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // An optional first argument names the dataset to open.
    let data_override = std::env::args_os().nth(1).map(PathBuf::from);
    let settings = Settings::load(data_override).context("loading settings")?;

    // Load once up front; the table is then shared read-only until a reload.
    let mut state = AppState::new(settings);
    state.load_startup();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Air Crash Data Analysis",
        options,
        Box::new(move |_cc| Ok(Box::new(CrashDashApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard: {e}"))
}
