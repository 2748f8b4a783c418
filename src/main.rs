//! Air Quality Dashboard - Shunyi Station
//!
//! Loads the PRSA air-quality dataset once at startup and serves an
//! interactive yearly-trend / correlation viewer over it.

mod charts;
mod data;
mod gui;
mod stats;

use anyhow::Context;
use data::Dataset;
use eframe::egui;
use gui::DashboardApp;
use std::path::Path;

/// Deploy-time dataset location; not a runtime parameter.
const DATASET_PATH: &str = "dataset/PRSA_Data_Shunyi_20130301-20170228.csv";

fn main() -> anyhow::Result<()> {
    // The dataset is loaded exactly once, before the window opens; any
    // failure here is fatal.
    let dataset = Dataset::load(Path::new(DATASET_PATH))
        .with_context(|| format!("failed to load air quality dataset from '{DATASET_PATH}'"))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1100.0, 650.0])
            .with_title("Air Quality Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "Air Quality Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, dataset)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start dashboard window: {e}"))?;

    Ok(())
}
