use tracing::info;
use ward_core::{
    Incident, IncidentId, IncidentStatus, Transition, VerifyDecision, WorkflowError,
};
use ward_storage::IncidentStore;

/// Admin audit of a completed fix. Approve finalizes the incident; reject
/// wipes the proof and returns it to the dispatch pool, where it can be
/// reassigned (possibly to a different worker).
pub fn verify(
    store: &dyn IncidentStore,
    id: IncidentId,
    decision: VerifyDecision,
    note: Option<String>,
) -> Result<Incident, WorkflowError> {
    let transition = match decision {
        VerifyDecision::Approve => Transition::Approve { note },
        VerifyDecision::Reject => Transition::Reject { note },
    };

    let incident = store.compare_and_transition(id, IncidentStatus::Completed, &transition)?;
    info!(
        incident = %incident.id,
        decision = ?decision,
        status = %incident.status,
        "audit decision recorded"
    );
    Ok(incident)
}
