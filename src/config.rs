//! Persisted application settings.
//!
//! Settings live in `config.toml` inside the `.tumor_classifier` directory. A
//! missing file yields defaults; unknown keys are ignored so older builds can
//! read newer files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs;

/// Default filename used to store the app configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Filename of the classifier model looked up when no path is configured.
pub const DEFAULT_MODEL_FILE_NAME: &str = "tumor_classifier.json";
/// Number of ranked predictions requested per classification.
pub const DEFAULT_TOP_K: usize = 4;
/// Upper bound for `model.top_k`.
pub const MAX_TOP_K: usize = 64;

/// Settings loaded from `config.toml`.
///
/// Config keys: `model`, `last_pick_dir`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub model: ModelSettings,
    /// Directory the photo dialog opened in last time.
    #[serde(default)]
    pub last_pick_dir: Option<PathBuf>,
}

/// Classifier model preferences.
///
/// Config keys: `model_path`, `top_k`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Explicit model file. `None` falls back to `models/tumor_classifier.json`.
    #[serde(default)]
    pub model_path: Option<PathBuf>,
    /// How many ranked predictions to keep before presentation.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model_path: None,
            top_k: default_top_k(),
        }
    }
}

impl AppConfig {
    fn normalized(mut self) -> Self {
        self.model.top_k = clamp_top_k(self.model.top_k);
        self
    }

    /// Resolve the model file, falling back to the app's models directory.
    pub fn resolved_model_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.model.model_path {
            return Ok(path.clone());
        }
        let dir = app_dirs::models_dir()?;
        Ok(dir.join(DEFAULT_MODEL_FILE_NAME))
    }
}

/// Errors that may occur while loading or saving app configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No usable config directory found.
    #[error("Config directory unavailable: {0}")]
    AppDir(#[from] app_dirs::AppDirError),
    /// Failed to read a config file.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to write a config file.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse TOML config.
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Failed to serialize config to TOML.
    #[error("Failed to serialize config to TOML at {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
}

/// Resolve the configuration file path, ensuring the parent directory exists.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME))
}

/// Load configuration from an explicit path, returning defaults if missing.
pub fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str::<AppConfig>(&text)
        .map(AppConfig::normalized)
        .map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })
}

/// Write configuration to an explicit path.
pub fn save_to_path(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    let text = toml::to_string_pretty(config).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, text).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn clamp_top_k(value: usize) -> usize {
    value.clamp(1, MAX_TOP_K)
}
