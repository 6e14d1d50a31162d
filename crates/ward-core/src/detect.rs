use crate::{error::WorkflowError, types::Detection};

/// Screen one frame's detections against the configured confidence
/// threshold. Returns the winning detection, or None when nothing clears
/// the bar ("no anomaly"). Out-of-range confidences are rejected before any
/// comparison happens.
pub fn screen(detections: &[Detection], threshold: f64) -> Result<Option<&Detection>, WorkflowError> {
    for d in detections {
        if !d.confidence.is_finite() || !(0.0..=1.0).contains(&d.confidence) {
            return Err(WorkflowError::Validation(format!(
                "confidence out of range for class {}: {}",
                d.class, d.confidence
            )));
        }
    }

    let best = detections
        .iter()
        .max_by(|a, b| a.confidence.total_cmp(&b.confidence));

    Ok(best.filter(|d| d.confidence > threshold))
}
