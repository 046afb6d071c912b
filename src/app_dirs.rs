//! Where the classifier keeps its config, model and log files.
//!
//! Everything lives in one `.tumor_classifier` folder under the OS config
//! directory (e.g. `%APPDATA%` on Windows). `TUMOR_CLASSIFIER_CONFIG_HOME`
//! replaces the OS directory, which tests and portable installs rely on.

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use thiserror::Error;

/// Name of the application directory that lives under the config base.
pub const APP_DIR_NAME: &str = ".tumor_classifier";
/// Environment variable that replaces the OS config directory.
pub const CONFIG_HOME_ENV: &str = "TUMOR_CLASSIFIER_CONFIG_HOME";

const LOGS_DIR_NAME: &str = "logs";
const MODELS_DIR_NAME: &str = "models";

/// Errors that can occur while resolving or preparing application directories.
#[derive(Debug, Error)]
pub enum AppDirError {
    /// Neither the override variable nor the OS provides a config directory.
    #[error("No config directory available; set {CONFIG_HOME_ENV}")]
    NoBaseDir,
    #[error("Failed to create application directory at {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The `.tumor_classifier` folder and its subfolders under one base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    root: PathBuf,
}

impl AppDirs {
    /// Anchor on the override variable, falling back to the OS config dir.
    pub fn resolve() -> Result<Self, AppDirError> {
        let override_home = std::env::var_os(CONFIG_HOME_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        let base = override_home
            .or_else(|| BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf()))
            .ok_or(AppDirError::NoBaseDir)?;
        Ok(Self::under(&base))
    }

    /// Anchor under an explicit base directory. Nothing is created yet.
    pub fn under(base: &Path) -> Self {
        Self {
            root: base.join(APP_DIR_NAME),
        }
    }

    /// The app folder itself, created on demand.
    pub fn root(&self) -> Result<PathBuf, AppDirError> {
        create(self.root.clone())
    }

    pub fn logs(&self) -> Result<PathBuf, AppDirError> {
        create(self.root.join(LOGS_DIR_NAME))
    }

    pub fn models(&self) -> Result<PathBuf, AppDirError> {
        create(self.root.join(MODELS_DIR_NAME))
    }
}

/// Return the root `.tumor_classifier` directory, creating it if needed.
pub fn app_root_dir() -> Result<PathBuf, AppDirError> {
    AppDirs::resolve()?.root()
}

/// Return the logs directory, creating it if needed.
pub fn logs_dir() -> Result<PathBuf, AppDirError> {
    AppDirs::resolve()?.logs()
}

/// Return the models directory, creating it if needed.
pub fn models_dir() -> Result<PathBuf, AppDirError> {
    AppDirs::resolve()?.models()
}

fn create(path: PathBuf) -> Result<PathBuf, AppDirError> {
    match std::fs::create_dir_all(&path) {
        Ok(()) => Ok(path),
        Err(source) => Err(AppDirError::CreateDir { path, source }),
    }
}
