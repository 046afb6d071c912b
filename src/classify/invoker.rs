//! Runs classifications off the UI thread and hands the rendered text back.
//!
//! Every request gets its own worker thread. Results come back through one
//! channel in completion order; the UI applies them as they arrive, so the
//! last classification to finish owns the display.

use std::{
    sync::{
        Arc,
        mpsc::{Receiver, Sender, TryRecvError},
    },
    thread,
};

use image::DynamicImage;
use thiserror::Error;
use tracing::{debug, error, warn};

use super::{
    Prediction, PredictionMap,
    pixels::{PixelInputError, pixel_input},
    presentation::render,
    ranking::top_k,
};
use crate::ml::{InferenceEngine, InferenceError};

/// Wake-up hook run by worker threads after they post.
pub type Notifier = Arc<dyn Fn() + Send + Sync>;

/// Rendered outcome of one classification request.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationMessage {
    pub request_id: u64,
    pub text: String,
}

/// Why a request produced no predictions.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("Could not build model input: {0}")]
    Input(#[from] PixelInputError),
    #[error("Inference failed: {0}")]
    Inference(#[from] InferenceError),
}

/// Build the pixel input for `image` and run the engine on it.
pub fn run_inference(
    engine: Option<&dyn InferenceEngine>,
    image: &DynamicImage,
) -> Result<PredictionMap, ClassifyError> {
    let engine = engine.ok_or(PixelInputError::NoModel)?;
    let input = pixel_input(image, engine.input_constraint())?;
    Ok(engine.predict(&input)?)
}

/// Classify one image synchronously. Any failure ranks to an empty result.
pub fn classify_image(
    engine: Option<&dyn InferenceEngine>,
    image: &DynamicImage,
    k: usize,
) -> Vec<Prediction> {
    match run_inference(engine, image) {
        Ok(scores) => top_k(k, &scores),
        Err(err) => {
            warn!("Classification produced no predictions: {err}");
            Vec::new()
        }
    }
}

/// Dispatches classification work and collects rendered results.
pub struct ClassificationJobs {
    engine: Option<Arc<dyn InferenceEngine>>,
    top_k: usize,
    message_tx: Sender<ClassificationMessage>,
    message_rx: Receiver<ClassificationMessage>,
    notifier: Option<Notifier>,
    next_request_id: u64,
    in_flight: usize,
}

impl ClassificationJobs {
    pub fn new(engine: Option<Arc<dyn InferenceEngine>>, top_k: usize) -> Self {
        let (message_tx, message_rx) = std::sync::mpsc::channel();
        Self {
            engine,
            top_k,
            message_tx,
            message_rx,
            notifier: None,
            next_request_id: 1,
            in_flight: 0,
        }
    }

    /// Callback run by workers after posting a result, e.g. to wake the UI.
    pub fn set_notifier(&mut self, notifier: impl Fn() + Send + Sync + 'static) {
        self.notifier = Some(Arc::new(notifier));
    }

    /// Shared handle to the installed notifier, for other worker threads.
    pub fn notifier(&self) -> Option<Notifier> {
        self.notifier.clone()
    }

    pub fn has_engine(&self) -> bool {
        self.engine.is_some()
    }

    /// Requests submitted whose result has not been received yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Classify `image` on a new worker thread. Returns the request id.
    pub fn submit(&mut self, image: Arc<DynamicImage>) -> u64 {
        let request_id = self.next_request_id();
        let engine = self.engine.clone();
        let k = self.top_k;
        let tx = self.message_tx.clone();
        let notifier = self.notifier.clone();
        let spawned = thread::Builder::new()
            .name(format!("classify-{request_id}"))
            .spawn(move || {
                let ranked = classify_image(engine.as_deref(), &image, k);
                debug!("Request {request_id} ranked {} predictions", ranked.len());
                post(&tx, notifier.as_ref(), request_id, render(&ranked));
            });
        if let Err(err) = spawned {
            error!("Failed to spawn classification worker: {err}");
            self.post_nothing_found(request_id);
        }
        request_id
    }

    /// Report a request whose image never made it to the pipeline.
    pub fn submit_failed(&mut self, reason: &dyn std::fmt::Display) -> u64 {
        let request_id = self.next_request_id();
        warn!("Request {request_id} could not be classified: {reason}");
        self.post_nothing_found(request_id);
        request_id
    }

    /// Next finished result, if any. Never blocks.
    pub fn try_recv(&mut self) -> Result<ClassificationMessage, TryRecvError> {
        let message = self.message_rx.try_recv()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Ok(message)
    }

    fn post_nothing_found(&self, request_id: u64) {
        post(
            &self.message_tx,
            self.notifier.as_ref(),
            request_id,
            render(&[]),
        );
    }

    fn next_request_id(&mut self) -> u64 {
        let request_id = self.next_request_id;
        self.next_request_id = self.next_request_id.wrapping_add(1).max(1);
        self.in_flight += 1;
        request_id
    }
}

fn post(
    tx: &Sender<ClassificationMessage>,
    notifier: Option<&Notifier>,
    request_id: u64,
    text: String,
) {
    let _ = tx.send(ClassificationMessage { request_id, text });
    if let Some(notify) = notifier {
        notify();
    }
}
