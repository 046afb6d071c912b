use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classify::ImageConstraint;

/// Model file format version understood by this build.
pub const MODEL_VERSION: i64 = 1;
/// Input name used when the model file omits one.
pub const DEFAULT_INPUT_NAME: &str = "sequential_5_input";
/// Output name used when the model file omits one.
pub const DEFAULT_OUTPUT_NAME: &str = "Identity";

/// Named image input of a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInput {
    #[serde(default = "default_input_name")]
    pub name: String,
    #[serde(flatten)]
    pub constraint: ImageConstraint,
}

/// Softmax image classifier stored as JSON.
///
/// Logits are `weights · (pixels * pixel_scale) + bias`, divided by
/// `temperature`. `weights` is row-major `[classes][features]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageClassifierModel {
    pub model_version: i64,
    pub input: ModelInput,
    #[serde(default = "default_output_name")]
    pub output_name: String,
    pub classes: Vec<String>,
    pub weights: Vec<f32>,
    pub bias: Vec<f32>,
    #[serde(default = "default_pixel_scale")]
    pub pixel_scale: f32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

/// Errors raised while loading a model file.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Failed to read model {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid model JSON at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Model at {path} is unusable: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

impl ImageClassifierModel {
    /// Validate the model version and dimensions.
    pub fn validate(&self) -> Result<(), String> {
        if self.model_version != MODEL_VERSION {
            return Err(format!(
                "Unsupported model_version {} (expected {})",
                self.model_version, MODEL_VERSION
            ));
        }
        if self.input.name.trim().is_empty() {
            return Err("input name is empty".to_string());
        }
        if self.output_name.trim().is_empty() {
            return Err("output_name is empty".to_string());
        }
        let features = self.input.constraint.feature_len().ok_or_else(|| {
            format!(
                "input `{}` constraint {}x{} is too large",
                self.input.name, self.input.constraint.width, self.input.constraint.height
            )
        })?;
        if features == 0 {
            return Err(format!("input `{}` has zero size", self.input.name));
        }
        let classes = self.classes.len();
        if classes == 0 {
            return Err("No classes defined".to_string());
        }
        let expected_weights = classes
            .checked_mul(features)
            .ok_or_else(|| format!("{classes} classes x {features} features is too large"))?;
        if self.weights.len() != expected_weights {
            return Err(format!(
                "weights length {} does not match {classes} classes x {features} features",
                self.weights.len()
            ));
        }
        if self.bias.len() != classes {
            return Err("bias length mismatch".to_string());
        }
        if !self.pixel_scale.is_finite() {
            return Err("pixel_scale must be finite".to_string());
        }
        if !self.temperature.is_finite() || self.temperature <= 0.0 {
            return Err("temperature must be > 0".to_string());
        }
        Ok(())
    }

    /// Load and validate a model from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self, ModelError> {
        let bytes = std::fs::read(path).map_err(|source| ModelError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let model: Self = serde_json::from_slice(&bytes).map_err(|source| ModelError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        model.validate().map_err(|reason| ModelError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(model)
    }

    /// Class probabilities for flattened pixels; empty on a length mismatch.
    pub fn predict_proba(&self, pixels: &[f32]) -> Vec<f32> {
        let Some(features) = self.input.constraint.feature_len() else {
            return Vec::new();
        };
        if features == 0 || pixels.len() != features || self.classes.is_empty() {
            return Vec::new();
        }
        let temp = self.temperature.max(1e-6);
        let logits: Vec<f32> = self
            .weights
            .chunks_exact(features)
            .zip(&self.bias)
            .map(|(row, bias)| {
                let dot: f32 = row
                    .iter()
                    .zip(pixels)
                    .map(|(w, p)| w * p * self.pixel_scale)
                    .sum();
                (dot + bias) / temp
            })
            .collect();
        softmax(&logits)
    }
}

/// Compute a numerically-stable softmax for a set of logits.
pub fn softmax(raw: &[f32]) -> Vec<f32> {
    if raw.is_empty() {
        return Vec::new();
    }
    let max = raw
        .iter()
        .copied()
        .fold(f32::NEG_INFINITY, |a, b| a.max(b));
    let mut exps: Vec<f32> = raw.iter().map(|&v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum == 0.0 || !sum.is_finite() {
        return vec![1.0 / raw.len() as f32; raw.len()];
    }
    for v in &mut exps {
        *v /= sum;
    }
    exps
}

fn default_input_name() -> String {
    DEFAULT_INPUT_NAME.to_string()
}

fn default_output_name() -> String {
    DEFAULT_OUTPUT_NAME.to_string()
}

fn default_pixel_scale() -> f32 {
    1.0 / 255.0
}

fn default_temperature() -> f32 {
    1.0
}
