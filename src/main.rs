mod app;
mod chart;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use app::MovieDashApp;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let path = Path::new(config::DATASET_PATH);
    let dataset = data::loader::load_dataset(path)
        .inspect_err(|e| log::error!("Dataset load failed: {e}"))
        .with_context(|| format!("Failed to load movie dataset from {}", path.display()))?;
    log::info!(
        "Loaded {} movies across {} genres",
        dataset.len(),
        dataset.genres.len()
    );

    let state = AppState::new(Arc::new(dataset)).context("Failed to aggregate movie dataset")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config::WINDOW_SIZE)
            .with_min_inner_size(config::WINDOW_MIN_SIZE),
        ..Default::default()
    };

    eframe::run_native(
        config::WINDOW_TITLE,
        options,
        Box::new(move |cc| {
            // Posters are fetched by URL.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(MovieDashApp::new(state)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("eframe failed: {e}"))
}
