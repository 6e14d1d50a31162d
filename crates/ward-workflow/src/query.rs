use ward_core::{
    stats, Incident, IncidentFilter, IncidentId, IncidentStatus, Overview, WorkerId,
    WorkflowError,
};
use ward_storage::IncidentStore;

/// The single read path behind every dashboard. Pure reads; never mutates.
pub fn list(
    store: &dyn IncidentStore,
    filter: &IncidentFilter,
) -> Result<Vec<Incident>, WorkflowError> {
    Ok(store.list(filter)?)
}

pub fn get(store: &dyn IncidentStore, id: IncidentId) -> Result<Incident, WorkflowError> {
    Ok(store.get(id)?)
}

pub fn overview(store: &dyn IncidentStore) -> Result<Overview, WorkflowError> {
    let all = store.list(&IncidentFilter::default())?;
    Ok(stats::overview(&all))
}

/// The worker's active queue: assigned to them, not yet completed.
pub fn worker_tasks(
    store: &dyn IncidentStore,
    worker: &WorkerId,
) -> Result<Vec<Incident>, WorkflowError> {
    Ok(store.list(&IncidentFilter {
        status: Some(IncidentStatus::Assigned),
        worker: Some(worker.clone()),
        ..Default::default()
    })?)
}

/// Pending incidents untouched for longer than `older_than_ms`.
pub fn stale_pending(
    store: &dyn IncidentStore,
    now_ms: i64,
    older_than_ms: i64,
) -> Result<Vec<Incident>, WorkflowError> {
    let all = store.list(&IncidentFilter {
        status: Some(IncidentStatus::Pending),
        ..Default::default()
    })?;
    Ok(stats::stale_pending(&all, now_ms, older_than_ms)
        .into_iter()
        .cloned()
        .collect())
}
