use serde::{Deserialize, Serialize};

use crate::{error::WorkflowError, ids::*, model::IncidentStatus, time::EpochMs};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

impl Location {
    pub fn validate(&self) -> Result<(), WorkflowError> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(WorkflowError::Validation(format!(
                "latitude out of range: {}",
                self.lat
            )));
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err(WorkflowError::Validation(format!(
                "longitude out of range: {}",
                self.lng
            )));
        }
        if self.address.trim().is_empty() {
            return Err(WorkflowError::Validation("address is empty".into()));
        }
        Ok(())
    }
}

/// Image references for an incident. `original` is fixed at creation;
/// `resolved` exists exactly while the incident is completed or verified.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Evidence {
    pub original: EvidenceRef,
    pub resolved: Option<EvidenceRef>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Incident {
    pub id: IncidentId,
    pub kind: IssueKind,
    pub severity: Option<String>,
    pub location: Location,
    pub status: IncidentStatus,
    pub assigned_worker: Option<WorkerId>,
    pub evidence: Evidence,
    pub audit_note: Option<String>,
    pub created_ms: EpochMs,
    pub last_transition_ms: EpochMs,
}

/// Everything the caller supplies for a new incident; the store assigns the
/// id and stamps the timestamps.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IncidentDraft {
    pub kind: IssueKind,
    pub severity: Option<String>,
    pub location: Location,
    pub original: EvidenceRef,
}

impl IncidentDraft {
    pub fn validate(&self) -> Result<(), WorkflowError> {
        if self.kind.is_blank() {
            return Err(WorkflowError::Validation("issue kind is empty".into()));
        }
        if self.original.is_blank() {
            return Err(WorkflowError::Validation(
                "original evidence reference is missing".into(),
            ));
        }
        self.location.validate()
    }

    pub fn into_incident(self, id: IncidentId, now: EpochMs) -> Incident {
        Incident {
            id,
            kind: self.kind,
            severity: self.severity,
            location: self.location,
            status: IncidentStatus::Pending,
            assigned_worker: None,
            evidence: Evidence {
                original: self.original,
                resolved: None,
            },
            audit_note: None,
            created_ms: now,
            last_transition_ms: now,
        }
    }
}

/// One candidate class from the external detector.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Detection {
    pub class: IssueKind,
    pub confidence: f64,
}

/// A full detector submission: whatever the model saw in one frame, plus
/// where the frame came from and the stored image reference.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetectionFrame {
    pub detections: Vec<Detection>,
    pub location: Location,
    pub image: EvidenceRef,
}

/// The manual reporting path. Treated identically to a detection once it
/// clears validation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CitizenReport {
    pub kind: IssueKind,
    pub severity: Option<String>,
    pub location: Location,
    pub image: EvidenceRef,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct IncidentFilter {
    pub status: Option<IncidentStatus>,
    pub kind: Option<IssueKind>,
    pub worker: Option<WorkerId>,
}

impl IncidentFilter {
    pub fn matches(&self, incident: &Incident) -> bool {
        if let Some(status) = self.status {
            if incident.status != status {
                return false;
            }
        }
        if let Some(kind) = &self.kind {
            if &incident.kind != kind {
                return false;
            }
        }
        if let Some(worker) = &self.worker {
            if incident.assigned_worker.as_ref() != Some(worker) {
                return false;
            }
        }
        true
    }
}
