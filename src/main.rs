// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! StrokeSeg - Stroke-guided segmentation annotator
//!
//! A desktop application for scribbling over an image, sending the image
//! and strokes to a segmentation backend, and viewing what comes back.

mod api;
mod app;
mod config;
mod io;
mod models;
mod ui;
mod util;

use anyhow::Result;
use app::StrokeSegApp;
use config::AppConfig;

fn main() -> Result<()> {
    let config = AppConfig::load()?;

    // Initialize logging; RUST_LOG takes precedence over the config file
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_filter()),
    )
    .init();

    let app = StrokeSegApp::new(config)?;

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("StrokeSeg - Stroke-guided segmentation annotator"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native("StrokeSeg", options, Box::new(|_cc| Ok(Box::new(app))))
        .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
