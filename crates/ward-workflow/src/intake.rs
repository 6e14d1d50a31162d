use tracing::info;
use ward_core::{
    detect, CitizenReport, DetectionFrame, Incident, IncidentDraft, IntakeOutcome, WorkflowError,
};
use ward_storage::IncidentStore;

/// Camera/detector path: screen the frame against the confidence threshold
/// and open an incident for the winning class, or report "no anomaly".
/// Duplicate frames of the same physical issue each open their own incident;
/// spatial dedup is deliberately not this component's job.
pub fn submit_detection(
    store: &dyn IncidentStore,
    threshold: f64,
    frame: DetectionFrame,
) -> Result<IntakeOutcome, WorkflowError> {
    frame.location.validate()?;
    if frame.image.is_blank() {
        return Err(WorkflowError::validation(
            "original evidence reference is missing",
        ));
    }

    let best = match detect::screen(&frame.detections, threshold)? {
        Some(d) => d.clone(),
        None => return Ok(IntakeOutcome::NoAnomaly),
    };

    let draft = IncidentDraft {
        kind: best.class.clone(),
        severity: None,
        location: frame.location,
        original: frame.image,
    };
    draft.validate()?;

    let incident = store.create(draft)?;
    info!(
        incident = %incident.id,
        kind = %incident.kind,
        confidence = best.confidence,
        "anomaly detected, incident opened"
    );
    Ok(IntakeOutcome::Opened { incident })
}

/// Manual citizen path. No threshold involved; the reporter has already
/// decided something is wrong. Identical to a detection downstream.
pub fn submit_report(
    store: &dyn IncidentStore,
    report: CitizenReport,
) -> Result<Incident, WorkflowError> {
    let draft = IncidentDraft {
        kind: report.kind,
        severity: report.severity,
        location: report.location,
        original: report.image,
    };
    draft.validate()?;

    let incident = store.create(draft)?;
    info!(incident = %incident.id, kind = %incident.kind, "citizen report filed");
    Ok(incident)
}
