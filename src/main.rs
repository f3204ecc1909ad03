//! Data Dashboard - CSV/Excel Data Cleaning & Interactive Dashboard Generator
//!
//! Upload a CSV or Excel file, resolve missing values, aggregate by a
//! categorical column and explore the result as tables and charts.

mod charts;
mod config;
mod data;
mod gui;
mod session;
mod stats;

use config::DashboardConfig;
use eframe::egui;
use gui::DashboardApp;
use std::path::PathBuf;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let config = DashboardConfig::load();
    // optional file to open on startup
    let initial_file = std::env::args_os().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("Data Dashboard Generator"),
        ..Default::default()
    };

    log::info!("Starting dashboard");
    eframe::run_native(
        "Data Dashboard Generator",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, config, initial_file)))),
    )
}
