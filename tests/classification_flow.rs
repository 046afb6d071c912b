mod support;

use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use support::{
    app_env::AppEnvGuard,
    photos::{brightness_model, undecided_model, write_model, write_photo},
};
use tempfile::TempDir;
use tumor_classifier::{
    app_dirs::APP_DIR_NAME,
    classify::{ColorMode, NOT_SURE_TEXT, NOTHING_FOUND_TEXT},
    config::{self, AppConfig, CONFIG_FILE_NAME, DEFAULT_MODEL_FILE_NAME},
    egui_app::{controller::ClassifierController, state::Backdrop},
    ml::ImageClassifierModel,
};

const BRIGHT_TEXT: &str = "glioma 88.1%\nno_tumor 11.9%";
const DARK_TEXT: &str = "no_tumor 88.1%\nglioma 11.9%";

struct Harness {
    _env: AppEnvGuard,
    temp: TempDir,
    controller: ClassifierController,
}

impl Harness {
    fn new(model: Option<&ImageClassifierModel>, config: Option<&AppConfig>) -> Self {
        let temp = tempfile::tempdir().expect("create tempdir");
        let config_home = temp.path().join("config");
        std::fs::create_dir_all(&config_home).expect("create config dir");
        let env = AppEnvGuard::set_config_home(config_home.clone());

        let app_dir = config_home.join(APP_DIR_NAME);
        if let Some(model) = model {
            write_model(
                &app_dir.join("models").join(DEFAULT_MODEL_FILE_NAME),
                model,
            );
        }
        if let Some(config) = config {
            config::save_to_path(config, &app_dir.join(CONFIG_FILE_NAME)).expect("save config");
        }

        let controller = ClassifierController::load().expect("load controller");
        Self {
            _env: env,
            temp,
            controller,
        }
    }

    fn photos_dir(&self) -> PathBuf {
        self.temp.path().join("photos")
    }

    fn config_file(&self) -> PathBuf {
        self.temp
            .path()
            .join("config")
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    fn classify(&mut self, path: &Path) -> String {
        self.controller.classify_path(path.to_path_buf());
        self.settle();
        self.controller.prediction_text().to_string()
    }

    fn settle(&mut self) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while self.controller.classifications_in_flight() > 0 && Instant::now() < deadline {
            self.controller.poll_background_jobs();
            std::thread::sleep(Duration::from_millis(2));
        }
        assert_eq!(self.controller.classifications_in_flight(), 0);
    }
}

#[test]
fn bright_photo_ranks_glioma_first() {
    let mut harness = Harness::new(Some(&brightness_model()), None);
    let photo = write_photo(&harness.photos_dir(), "bright.png", [255, 255, 255]);
    assert_eq!(harness.controller.ui.backdrop, Backdrop::Dark);
    assert_eq!(harness.classify(&photo), BRIGHT_TEXT);
    assert_eq!(harness.controller.ui.backdrop, Backdrop::Light);
}

#[test]
fn dark_photo_ranks_no_tumor_first() {
    let mut harness = Harness::new(Some(&brightness_model()), None);
    let photo = write_photo(&harness.photos_dir(), "dark.png", [0, 0, 0]);
    assert_eq!(harness.classify(&photo), DARK_TEXT);
}

#[test]
fn configured_top_k_limits_lines() {
    let mut config = AppConfig::default();
    config.model.top_k = 1;
    let mut harness = Harness::new(Some(&brightness_model()), Some(&config));
    let photo = write_photo(&harness.photos_dir(), "bright.png", [255, 255, 255]);
    assert_eq!(harness.classify(&photo), "glioma 88.1%");
}

#[test]
fn evenly_spread_confidence_is_not_sure() {
    let mut harness = Harness::new(Some(&undecided_model()), None);
    let photo = write_photo(&harness.photos_dir(), "gray.png", [128, 128, 128]);
    assert_eq!(harness.classify(&photo), NOT_SURE_TEXT);
}

#[test]
fn missing_model_reports_nothing_found() {
    let mut harness = Harness::new(None, None);
    assert_eq!(harness.controller.ui.status.badge_label, "No model");
    let photo = write_photo(&harness.photos_dir(), "bright.png", [255, 255, 255]);
    assert_eq!(harness.classify(&photo), NOTHING_FOUND_TEXT);
    assert!(harness.controller.ui.photo.is_some());
}

#[test]
fn corrupt_model_reports_nothing_found() {
    let mut broken = brightness_model();
    broken.bias.push(0.0);
    let mut harness = Harness::new(Some(&broken), None);
    let photo = write_photo(&harness.photos_dir(), "bright.png", [255, 255, 255]);
    assert_eq!(harness.classify(&photo), NOTHING_FOUND_TEXT);
}

#[test]
fn oversized_model_input_runs_without_a_model() {
    let mut huge = brightness_model();
    huge.input.constraint.width = u32::MAX;
    huge.input.constraint.height = u32::MAX;
    huge.input.constraint.color = ColorMode::Rgb;
    let mut harness = Harness::new(Some(&huge), None);
    assert_eq!(harness.controller.ui.status.badge_label, "No model");
    let photo = write_photo(&harness.photos_dir(), "bright.png", [255, 255, 255]);
    assert_eq!(harness.classify(&photo), NOTHING_FOUND_TEXT);
}

#[test]
fn unreadable_photo_reports_nothing_found() {
    let mut harness = Harness::new(Some(&brightness_model()), None);
    let photo = harness.photos_dir().join("missing.png");
    assert_eq!(harness.classify(&photo), NOTHING_FOUND_TEXT);
    assert!(harness.controller.ui.photo.is_none());
}

#[test]
fn new_result_replaces_previous_text() {
    let mut harness = Harness::new(Some(&brightness_model()), None);
    let bright = write_photo(&harness.photos_dir(), "bright.png", [255, 255, 255]);
    let dark = write_photo(&harness.photos_dir(), "dark.png", [0, 0, 0]);
    assert_eq!(harness.classify(&bright), BRIGHT_TEXT);
    assert_eq!(harness.classify(&dark), DARK_TEXT);
}

#[test]
fn concurrent_picks_show_whichever_finished_last() {
    let mut harness = Harness::new(Some(&brightness_model()), None);
    let bright = write_photo(&harness.photos_dir(), "bright.png", [255, 255, 255]);
    let dark = write_photo(&harness.photos_dir(), "dark.png", [0, 0, 0]);
    harness.controller.classify_path(bright);
    harness.controller.classify_path(dark);
    harness.settle();
    let text = harness.controller.prediction_text();
    assert!(text == BRIGHT_TEXT || text == DARK_TEXT, "unexpected {text:?}");
}

#[test]
fn pick_directory_is_remembered() {
    let mut harness = Harness::new(Some(&brightness_model()), None);
    let photo = write_photo(&harness.photos_dir(), "bright.png", [255, 255, 255]);
    harness.classify(&photo);
    let saved = config::load_from(&harness.config_file()).expect("reload config");
    assert_eq!(saved.last_pick_dir, Some(harness.photos_dir()));
}
