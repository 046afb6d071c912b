use thiserror::Error;

use super::ImageClassifierModel;
use crate::classify::{ImageConstraint, PixelInput, PredictionMap};

/// Inference boundary seen by the classification pipeline.
///
/// Implementations are shared read-only across worker threads.
pub trait InferenceEngine: Send + Sync {
    /// Shape the pixel input must be built to.
    fn input_constraint(&self) -> ImageConstraint;

    /// Run one prediction, returning a probability per label.
    fn predict(&self, input: &PixelInput) -> Result<PredictionMap, InferenceError>;
}

/// Failures reported by an [`InferenceEngine`].
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Input `{input}` has {actual} values but the model expects {expected}")]
    ShapeMismatch {
        input: String,
        expected: usize,
        actual: usize,
    },
    #[error("Input `{input}` is too large to evaluate")]
    InputTooLarge { input: String },
    #[error("Model produced no output for `{output}`")]
    EmptyOutput { output: String },
}

impl InferenceEngine for ImageClassifierModel {
    fn input_constraint(&self) -> ImageConstraint {
        self.input.constraint
    }

    fn predict(&self, input: &PixelInput) -> Result<PredictionMap, InferenceError> {
        let Some(expected) = self.input.constraint.feature_len() else {
            return Err(InferenceError::InputTooLarge {
                input: self.input.name.clone(),
            });
        };
        if input.data.len() != expected || input.channels != self.input.constraint.color.channels()
        {
            return Err(InferenceError::ShapeMismatch {
                input: self.input.name.clone(),
                expected,
                actual: input.data.len(),
            });
        }
        let proba = self.predict_proba(&input.data);
        if proba.len() != self.classes.len() {
            return Err(InferenceError::EmptyOutput {
                output: self.output_name.clone(),
            });
        }
        Ok(self
            .classes
            .iter()
            .cloned()
            .zip(proba.into_iter().map(f64::from))
            .collect())
    }
}
