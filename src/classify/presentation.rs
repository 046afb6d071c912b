//! Turns a ranked result into the single line of text shown under the photo.

use super::Prediction;

/// Shown when the ranked result is empty, including every pipeline failure.
pub const NOTHING_FOUND_TEXT: &str = "nothing found";
/// Shown when the best prediction falls below [`CONFIDENCE_THRESHOLD`].
pub const NOT_SURE_TEXT: &str = "not sure";
/// A top prediction strictly below this is reported as unsure.
pub const CONFIDENCE_THRESHOLD: f64 = 0.5;
/// Lines shown at most, regardless of how many predictions were ranked.
pub const MAX_DISPLAYED: usize = 4;

/// Render the display text for a ranked result.
pub fn render(results: &[Prediction]) -> String {
    let Some(best) = results.first() else {
        return NOTHING_FOUND_TEXT.to_string();
    };
    if best.confidence < CONFIDENCE_THRESHOLD {
        return NOT_SURE_TEXT.to_string();
    }
    results
        .iter()
        .take(MAX_DISPLAYED)
        .map(format_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_line(prediction: &Prediction) -> String {
    format!("{} {:.1}%", prediction.label, prediction.confidence * 100.0)
}
