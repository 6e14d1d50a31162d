use serde::{Deserialize, Serialize};

use crate::{
    ids::{EvidenceRef, WorkerId},
    model::IncidentStatus,
    time::EpochMs,
    types::Incident,
};

/// The closed set of status-changing operations. There are no other edges:
///
/// ```text
/// pending   --Assign-->   assigned
/// assigned  --Complete--> completed
/// completed --Approve-->  verified   (terminal)
/// completed --Reject-->   pending
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Transition {
    Assign { worker: WorkerId },
    Complete { resolved: EvidenceRef },
    Approve { note: Option<String> },
    Reject { note: Option<String> },
}

impl Transition {
    /// The status the record must still hold for this transition to apply.
    pub fn expected_status(&self) -> IncidentStatus {
        match self {
            Transition::Assign { .. } => IncidentStatus::Pending,
            Transition::Complete { .. } => IncidentStatus::Assigned,
            Transition::Approve { .. } | Transition::Reject { .. } => IncidentStatus::Completed,
        }
    }

    pub fn target_status(&self) -> IncidentStatus {
        match self {
            Transition::Assign { .. } => IncidentStatus::Assigned,
            Transition::Complete { .. } => IncidentStatus::Completed,
            Transition::Approve { .. } => IncidentStatus::Verified,
            Transition::Reject { .. } => IncidentStatus::Pending,
        }
    }
}

/// Compute the post-transition record. Pure; both store implementations call
/// this under their own atomicity guarantee, so the rules live here once.
///
/// Rejection clears both the resolved evidence and the worker assignment:
/// a reopened incident goes back to the dispatch pool as fresh work.
pub fn apply(incident: &Incident, transition: &Transition, now: EpochMs) -> Incident {
    let mut next = incident.clone();
    next.status = transition.target_status();
    next.last_transition_ms = now;
    match transition {
        Transition::Assign { worker } => {
            next.assigned_worker = Some(worker.clone());
        }
        Transition::Complete { resolved } => {
            next.evidence.resolved = Some(resolved.clone());
        }
        Transition::Approve { note } => {
            if let Some(note) = note {
                next.audit_note = Some(note.clone());
            }
        }
        Transition::Reject { note } => {
            next.evidence.resolved = None;
            next.assigned_worker = None;
            next.audit_note = Some(format!("REJECTED: {}", note.as_deref().unwrap_or("")));
        }
    }
    next
}

/// The two record-level invariants that must hold at every observable state:
/// resolved evidence iff completed/verified, worker iff assigned or later.
pub fn record_is_consistent(incident: &Incident) -> bool {
    let resolved_ok = match incident.status {
        IncidentStatus::Completed | IncidentStatus::Verified => {
            incident.evidence.resolved.is_some()
        }
        IncidentStatus::Pending | IncidentStatus::Assigned => {
            incident.evidence.resolved.is_none()
        }
    };
    let worker_ok = match incident.status {
        IncidentStatus::Assigned | IncidentStatus::Completed | IncidentStatus::Verified => {
            incident.assigned_worker.is_some()
        }
        IncidentStatus::Pending => incident.assigned_worker.is_none(),
    };
    resolved_ok && worker_ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{IncidentId, IssueKind};
    use crate::types::{IncidentDraft, Location};

    fn pending() -> Incident {
        IncidentDraft {
            kind: IssueKind::new("pothole"),
            severity: Some("high".into()),
            location: Location {
                lat: 23.2599,
                lng: 77.4126,
                address: "MP Nagar".into(),
            },
            original: EvidenceRef::new("pothole_orig"),
        }
        .into_incident(IncidentId(1), 100)
    }

    #[test]
    fn every_edge_keeps_the_record_consistent() {
        let p = pending();
        assert!(record_is_consistent(&p));

        let assigned = apply(
            &p,
            &Transition::Assign {
                worker: WorkerId::new("worker_01"),
            },
            200,
        );
        assert_eq!(assigned.status, IncidentStatus::Assigned);
        assert_eq!(assigned.assigned_worker, Some(WorkerId::new("worker_01")));
        assert_eq!(assigned.last_transition_ms, 200);
        assert!(record_is_consistent(&assigned));

        let completed = apply(
            &assigned,
            &Transition::Complete {
                resolved: EvidenceRef::new("pothole_fixed"),
            },
            300,
        );
        assert_eq!(completed.status, IncidentStatus::Completed);
        assert!(completed.evidence.resolved.is_some());
        assert!(record_is_consistent(&completed));

        let verified = apply(&completed, &Transition::Approve { note: None }, 400);
        assert_eq!(verified.status, IncidentStatus::Verified);
        assert!(record_is_consistent(&verified));

        let reopened = apply(
            &completed,
            &Transition::Reject {
                note: Some("patch washed out".into()),
            },
            400,
        );
        assert_eq!(reopened.status, IncidentStatus::Pending);
        assert!(reopened.evidence.resolved.is_none());
        assert!(reopened.assigned_worker.is_none());
        assert_eq!(
            reopened.audit_note.as_deref(),
            Some("REJECTED: patch washed out")
        );
        assert!(record_is_consistent(&reopened));
    }

    #[test]
    fn immutable_fields_survive_transitions() {
        let p = pending();
        let assigned = apply(
            &p,
            &Transition::Assign {
                worker: WorkerId::new("worker_01"),
            },
            200,
        );
        assert_eq!(assigned.id, p.id);
        assert_eq!(assigned.kind, p.kind);
        assert_eq!(assigned.severity, p.severity);
        assert_eq!(assigned.evidence.original, p.evidence.original);
        assert_eq!(assigned.created_ms, p.created_ms);
    }

    #[test]
    fn expected_and_target_statuses_form_the_lifecycle_graph() {
        let assign = Transition::Assign {
            worker: WorkerId::new("w"),
        };
        let complete = Transition::Complete {
            resolved: EvidenceRef::new("r"),
        };
        let approve = Transition::Approve { note: None };
        let reject = Transition::Reject { note: None };

        assert_eq!(assign.expected_status(), IncidentStatus::Pending);
        assert_eq!(assign.target_status(), IncidentStatus::Assigned);
        assert_eq!(complete.expected_status(), IncidentStatus::Assigned);
        assert_eq!(complete.target_status(), IncidentStatus::Completed);
        assert_eq!(approve.expected_status(), IncidentStatus::Completed);
        assert_eq!(approve.target_status(), IncidentStatus::Verified);
        assert_eq!(reject.expected_status(), IncidentStatus::Completed);
        assert_eq!(reject.target_status(), IncidentStatus::Pending);
    }

    #[test]
    fn approve_records_note_when_given() {
        let completed = apply(
            &apply(
                &pending(),
                &Transition::Assign {
                    worker: WorkerId::new("w"),
                },
                1,
            ),
            &Transition::Complete {
                resolved: EvidenceRef::new("r"),
            },
            2,
        );
        let verified = apply(
            &completed,
            &Transition::Approve {
                note: Some("clean fill, level surface".into()),
            },
            3,
        );
        assert_eq!(
            verified.audit_note.as_deref(),
            Some("clean fill, level surface")
        );
    }
}
