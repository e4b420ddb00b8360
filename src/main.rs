// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Texture Layout Tool
//!
//! A cross-platform desktop application for arranging texture images on
//! a canvas and writing the layout file used by the asset pipeline.

mod app;
mod ui;

use anyhow::Result;
use app::TexLayoutApp;
use texlayout::io::settings::AppSettings;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let settings = AppSettings::load_or_default();

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size(settings.window_size.unwrap_or([1280.0, 800.0]))
        .with_min_inner_size([800.0, 600.0])
        .with_title("Texture Layout Tool");
    if let Some(position) = settings.window_position {
        viewport = viewport.with_position(position);
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Texture Layout Tool",
        options,
        Box::new(move |_cc| Ok(Box::new(TexLayoutApp::new(settings)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
