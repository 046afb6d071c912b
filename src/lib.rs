//! Photo classifier: ranks a model's label confidences and renders them for display.
/// Application directory resolution.
pub mod app_dirs;
/// Image pipeline: pixel input, ranking, presentation and background dispatch.
pub mod classify;
/// TOML-backed settings.
pub mod config;
/// egui front end.
pub mod egui_app;
/// Tracing subscriber setup.
pub mod logging;
/// Classifier model and inference boundary.
pub mod ml;
