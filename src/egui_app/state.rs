//! UI state owned by the controller and drawn by [`crate::egui_app::ui`].

use egui::{Color32, ColorImage};
use std::path::PathBuf;

/// Largest edge of the on-screen photo preview, in pixels.
pub const PREVIEW_MAX_EDGE: u32 = 1024;

/// Top-level UI model consumed by the egui renderer.
#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub prediction: PredictionState,
    pub photo: Option<PhotoPreview>,
    pub backdrop: Backdrop,
    pub status: StatusBarState,
}

/// Text under the photo. Only the controller writes it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PredictionState {
    pub text: String,
}

/// Picked photo, already converted for upload as a texture.
#[derive(Clone, Debug)]
pub struct PhotoPreview {
    pub path: PathBuf,
    pub image: ColorImage,
    /// Bumped on every pick so the renderer knows to replace its texture.
    pub generation: u64,
}

/// Window background: dark until the first photo is picked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Backdrop {
    #[default]
    Dark,
    Light,
}

impl Backdrop {
    pub fn fill(self) -> Color32 {
        match self {
            Backdrop::Dark => Color32::DARK_GRAY,
            Backdrop::Light => Color32::WHITE,
        }
    }

    pub fn text(self) -> Color32 {
        match self {
            Backdrop::Dark => Color32::WHITE,
            Backdrop::Light => Color32::BLACK,
        }
    }
}

/// Footer line describing model and job status.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBarState {
    pub text: String,
    pub badge_label: String,
    pub badge_color: Color32,
}

impl StatusBarState {
    pub fn idle() -> Self {
        Self {
            text: "Pick a photo to classify".into(),
            badge_label: "Idle".into(),
            badge_color: Color32::from_rgb(42, 44, 48),
        }
    }

    pub fn busy(in_flight: usize) -> Self {
        Self {
            text: format!("Classifying {in_flight} photo(s)"),
            badge_label: "Busy".into(),
            badge_color: Color32::from_rgb(167, 217, 255),
        }
    }

    pub fn no_model(reason: &str) -> Self {
        Self {
            text: format!("No classifier model loaded: {reason}"),
            badge_label: "No model".into(),
            badge_color: Color32::from_rgb(200, 128, 96),
        }
    }
}

impl Default for StatusBarState {
    fn default() -> Self {
        Self::idle()
    }
}
