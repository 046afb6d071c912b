use std::cmp::Ordering;

use super::{Prediction, PredictionMap};

/// Return the `k` highest-confidence predictions, best first.
///
/// Equal confidences are ordered by label so the result is deterministic.
/// NaN confidences rank below every number. `k == 0` or an empty map yields an
/// empty vector.
pub fn top_k(k: usize, scores: &PredictionMap) -> Vec<Prediction> {
    if k == 0 || scores.is_empty() {
        return Vec::new();
    }
    let mut entries: Vec<(&String, f64)> = scores
        .iter()
        .map(|(label, &confidence)| (label, confidence))
        .collect();
    entries.sort_by(compare_ranked);
    entries
        .into_iter()
        .take(k.min(scores.len()))
        .map(|(label, confidence)| Prediction::new(label.clone(), confidence))
        .collect()
}

fn compare_ranked(a: &(&String, f64), b: &(&String, f64)) -> Ordering {
    rank_key(b.1)
        .total_cmp(&rank_key(a.1))
        .then_with(|| a.0.cmp(b.0))
}

fn rank_key(confidence: f64) -> f64 {
    if confidence.is_nan() {
        f64::NEG_INFINITY
    } else {
        confidence
    }
}
