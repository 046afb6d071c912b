#![deny(missing_docs)]
#![deny(warnings)]

//! Entry point for the Tumor Classifier window.
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]
use eframe::egui;
use tumor_classifier::egui_app::controller::ClassifierController;
use tumor_classifier::egui_app::ui::{EguiApp, MIN_VIEWPORT_SIZE};
use tumor_classifier::logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    let viewport = egui::ViewportBuilder::default()
        .with_min_inner_size(MIN_VIEWPORT_SIZE)
        .with_inner_size(egui::vec2(480.0, 720.0))
        .with_title("Tumor Classifier");
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Tumor Classifier",
        native_options,
        Box::new(|_cc| {
            let app: Box<dyn eframe::App> = match ClassifierController::load() {
                Ok(controller) => Box::new(EguiApp::new(controller)),
                Err(err) => {
                    tracing::error!("Failed to start: {err}");
                    Box::new(LaunchError {
                        message: format!("Failed to load config: {err}"),
                    })
                }
            };
            Ok(app)
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
                ui.heading("Failed to start");
                ui.label(&self.message);
            });
        });
    }
}
