//! Entry point for the egui-based Scan Detect UI.
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]
use std::sync::Arc;

use eframe::egui;
use scan_detect::config;
use scan_detect::egui_app::ui::{EguiApp, MIN_VIEWPORT_SIZE};
use scan_detect::inference::HttpInferenceClient;
use scan_detect::logging;
use tracing::{error, info};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }
    info!("Starting Scan Detect v{}", env!("CARGO_PKG_VERSION"));

    let client = match config::load_inference_settings() {
        Ok(settings) => Ok(Arc::new(HttpInferenceClient::new(&settings))),
        Err(err) => {
            error!("Failed to load config: {err}");
            Err(format!("Failed to load config: {err}"))
        }
    };

    let viewport = egui::ViewportBuilder::default()
        .with_title("Scan Detect")
        .with_inner_size(egui::vec2(1024.0, 720.0))
        .with_min_inner_size(MIN_VIEWPORT_SIZE)
        .with_drag_and_drop(true);
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Scan Detect",
        native_options,
        Box::new(move |_cc| match client {
            Ok(client) => Ok(Box::new(EguiApp::new(client))),
            Err(message) => Ok(Box::new(LaunchError { message })),
        }),
    )?;
    Ok(())
}

/// Minimal fallback app to display initialization errors.
struct LaunchError {
    message: String,
}

impl eframe::App for LaunchError {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Failed to start UI");
                ui.label(&self.message);
            });
        });
    }
}
