//! Classification pipeline: pixel input, ranking, presentation, dispatch.
//!
//! The flow for one picked photo is
//! image → [`pixels::pixel_input`] → engine → [`ranking::top_k`] →
//! [`presentation::render`] → display text.

use std::collections::HashMap;

pub mod invoker;
pub mod pixels;
pub mod presentation;
pub mod ranking;

pub use invoker::{ClassificationJobs, ClassificationMessage, Notifier, classify_image};
pub use pixels::{ColorMode, ImageConstraint, PixelInput, PixelInputError};
pub use presentation::{NOT_SURE_TEXT, NOTHING_FOUND_TEXT, render};
pub use ranking::top_k;

/// Full output of one inference call: label to confidence in `[0, 1]`.
pub type PredictionMap = HashMap<String, f64>;

/// One ranked (label, confidence) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub confidence: f64,
}

impl Prediction {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}
