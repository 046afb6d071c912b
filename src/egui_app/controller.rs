//! Bridges photo picking, background classification and the UI state.

use std::path::PathBuf;
use std::sync::{
    Arc,
    mpsc::{Receiver, Sender, TryRecvError},
};

use rfd::FileDialog;
use tracing::{debug, error, info, warn};

use crate::classify::ClassificationJobs;
use crate::config::{self, AppConfig, ConfigError};
use crate::egui_app::state::{Backdrop, PhotoPreview, StatusBarState, UiState};
use crate::ml::{self, InferenceEngine};

mod photo_loader;

use photo_loader::{PhotoLoadJob, PhotoLoadResult, spawn_photo_load};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tif", "tiff", "webp"];

/// Maintains app state and bridges classification to the egui UI.
pub struct ClassifierController {
    pub ui: UiState,
    jobs: ClassificationJobs,
    config: AppConfig,
    config_path: Option<PathBuf>,
    model_issue: Option<String>,
    photo_tx: Sender<PhotoLoadResult>,
    photo_rx: Receiver<PhotoLoadResult>,
    photos_loading: usize,
    next_photo_generation: u64,
}

impl ClassifierController {
    /// Build a controller around an already-loaded engine. Nothing is persisted.
    pub fn new(config: AppConfig, engine: Option<Arc<dyn InferenceEngine>>) -> Self {
        let model_issue = engine
            .is_none()
            .then(|| "model not configured".to_string());
        let (photo_tx, photo_rx) = std::sync::mpsc::channel();
        let mut controller = Self {
            ui: UiState::default(),
            jobs: ClassificationJobs::new(engine, config.model.top_k),
            config,
            config_path: None,
            model_issue,
            photo_tx,
            photo_rx,
            photos_loading: 0,
            next_photo_generation: 1,
        };
        controller.refresh_status();
        controller
    }

    /// Load config and model from the app directory.
    ///
    /// A model that fails to load is logged and leaves the app running without
    /// one; every classification then reports "nothing found".
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = config::config_path()?;
        let config = config::load_from(&config_path)?;
        let model_path = config.resolved_model_path()?;
        let (engine, issue) = match ml::load_engine(&model_path) {
            Ok(engine) => (Some(engine), None),
            Err(err) => {
                warn!("Continuing without a classifier: {err}");
                (None, Some(err.to_string()))
            }
        };
        let mut controller = Self::new(config, engine);
        controller.config_path = Some(config_path);
        controller.model_issue = issue;
        controller.refresh_status();
        Ok(controller)
    }

    /// Register a callback fired from worker threads when a result is posted.
    pub fn set_result_notifier(&mut self, notify: impl Fn() + Send + Sync + 'static) {
        self.jobs.set_notifier(notify);
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn prediction_text(&self) -> &str {
        &self.ui.prediction.text
    }

    /// Picks not yet rendered, counting photos that are still decoding.
    pub fn classifications_in_flight(&self) -> usize {
        self.jobs.in_flight() + self.photos_loading
    }

    /// Show the native photo picker and classify the chosen file.
    pub fn pick_photo_via_dialog(&mut self) {
        let mut dialog = FileDialog::new()
            .set_title("Pick a photo")
            .add_filter("Images", IMAGE_EXTENSIONS);
        if let Some(dir) = self.config.last_pick_dir.as_ref().filter(|dir| dir.is_dir()) {
            dialog = dialog.set_directory(dir);
        }
        let Some(path) = dialog.pick_file() else {
            return;
        };
        self.classify_path(path);
    }

    /// Start decoding `path` in the background; classification follows once
    /// the photo is shown.
    pub fn classify_path(&mut self, path: PathBuf) {
        self.ui.backdrop = Backdrop::Light;
        self.remember_pick_dir(&path);
        let generation = self.next_photo_generation;
        self.next_photo_generation += 1;
        debug!("Loading photo {generation} from {}", path.display());
        let job = PhotoLoadJob { generation, path };
        match spawn_photo_load(job, self.photo_tx.clone(), self.jobs.notifier()) {
            Ok(()) => self.photos_loading += 1,
            Err(err) => {
                error!("Failed to spawn photo loader: {err}");
                self.ui.photo = None;
                self.jobs.submit_failed(&err);
            }
        }
        self.refresh_status();
    }

    /// Apply decoded photos, then every finished classification, in arrival
    /// order.
    pub fn poll_background_jobs(&mut self) {
        while let Ok(loaded) = self.photo_rx.try_recv() {
            self.photos_loading = self.photos_loading.saturating_sub(1);
            self.apply_loaded_photo(loaded);
        }
        loop {
            match self.jobs.try_recv() {
                Ok(message) => {
                    debug!("Displaying result of request {}", message.request_id);
                    self.set_prediction_text(message.text);
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        self.refresh_status();
    }

    fn set_prediction_text(&mut self, text: String) {
        self.ui.prediction.text = text;
    }

    fn apply_loaded_photo(&mut self, loaded: PhotoLoadResult) {
        // Only the most recent pick owns the preview.
        let newest = loaded.generation + 1 == self.next_photo_generation;
        match loaded.result {
            Ok(outcome) => {
                info!("Classifying {}", loaded.path.display());
                if newest {
                    self.ui.photo = Some(PhotoPreview {
                        path: loaded.path,
                        image: outcome.preview,
                        generation: loaded.generation,
                    });
                }
                self.jobs.submit(outcome.image);
            }
            Err(err) => {
                if newest {
                    self.ui.photo = None;
                }
                self.jobs.submit_failed(&err);
            }
        }
    }

    fn remember_pick_dir(&mut self, path: &std::path::Path) {
        let Some(dir) = path.parent().map(|dir| dir.to_path_buf()) else {
            return;
        };
        if self.config.last_pick_dir.as_ref() == Some(&dir) {
            return;
        }
        self.config.last_pick_dir = Some(dir);
        if let Some(config_path) = &self.config_path
            && let Err(err) = config::save_to_path(&self.config, config_path)
        {
            warn!("Failed to save config: {err}");
        }
    }

    fn refresh_status(&mut self) {
        let in_flight = self.classifications_in_flight();
        self.ui.status = if in_flight > 0 {
            StatusBarState::busy(in_flight)
        } else if let Some(issue) = &self.model_issue {
            StatusBarState::no_model(issue)
        } else {
            StatusBarState::idle()
        };
    }
}
