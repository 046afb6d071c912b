//! Classifier model and the inference boundary the pipeline talks to.

use std::{path::Path, sync::Arc};

mod engine;
mod model;

pub use engine::{InferenceEngine, InferenceError};
pub use model::{
    DEFAULT_INPUT_NAME, DEFAULT_OUTPUT_NAME, ImageClassifierModel, MODEL_VERSION, ModelError,
    ModelInput, softmax,
};

/// Load a model file into a shareable engine.
pub fn load_engine(path: &Path) -> Result<Arc<dyn InferenceEngine>, ModelError> {
    let model = ImageClassifierModel::load_json(path)?;
    tracing::info!(
        "Loaded classifier model {} ({} classes, input `{}` {}x{}, output `{}`)",
        path.display(),
        model.classes.len(),
        model.input.name,
        model.input.constraint.width,
        model.input.constraint.height,
        model.output_name
    );
    Ok(Arc::new(model))
}
