mod app;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use std::sync::Arc;

use anyhow::Context;
use app::BikeDashboardApp;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DashboardConfig::from_env().context("reading dashboard configuration")?;
    log::debug!("{config:?}");

    // Both tables are loaded once and shared read-only; nothing renders if
    // either fails.
    let dataset = data::loader::load_dataset(&config.daily_path, &config.hourly_path)
        .with_context(|| {
            format!(
                "loading datasets ({} and {})",
                config.daily_path.display(),
                config.hourly_path.display()
            )
        })
        .inspect_err(|e| log::error!("{e:#}"))?;
    log::info!("Dataset ready: {dataset}");

    let state = AppState::new(Arc::new(dataset), config.locale);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Bike Sharing Data Analysis",
        options,
        Box::new(|_cc| Ok(Box::new(BikeDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard window: {e}"))
}
