use tracing::info;
use ward_core::{
    EvidenceRef, Incident, IncidentId, IncidentStatus, Transition, WorkerId, WorkflowError,
};
use ward_storage::IncidentStore;

/// Worker path: submit proof-of-fix for an assigned incident. A worker may
/// only complete their own task; anyone else is Forbidden no matter what
/// status the incident is in.
pub fn complete(
    store: &dyn IncidentStore,
    id: IncidentId,
    worker: WorkerId,
    resolved: EvidenceRef,
) -> Result<Incident, WorkflowError> {
    if worker.is_blank() {
        return Err(WorkflowError::validation("worker id is empty"));
    }
    if resolved.is_blank() {
        return Err(WorkflowError::validation(
            "resolved evidence reference is missing",
        ));
    }

    let current = store.get(id)?;
    if current.assigned_worker.as_ref() != Some(&worker) {
        return Err(WorkflowError::Forbidden(format!(
            "incident {id} is not assigned to {worker}"
        )));
    }

    let incident = store.compare_and_transition(
        id,
        IncidentStatus::Assigned,
        &Transition::Complete { resolved },
    )?;
    info!(incident = %incident.id, worker = %worker, "fix submitted for audit");
    Ok(incident)
}
