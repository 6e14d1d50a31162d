use tracing::info;
use ward_core::{Incident, IncidentId, IncidentStatus, Transition, WorkerId, WorkflowError};
use ward_storage::IncidentStore;

/// Admin path: hand a pending incident to a field worker. If another admin
/// got there first the compare step fails and the caller sees Conflict;
/// at most one assignment wins, nothing is overwritten.
pub fn assign(
    store: &dyn IncidentStore,
    id: IncidentId,
    worker: WorkerId,
) -> Result<Incident, WorkflowError> {
    if worker.is_blank() {
        return Err(WorkflowError::validation("worker id is empty"));
    }

    let incident = store.compare_and_transition(
        id,
        IncidentStatus::Pending,
        &Transition::Assign {
            worker: worker.clone(),
        },
    )?;
    info!(incident = %incident.id, worker = %worker, "incident dispatched");
    Ok(incident)
}
