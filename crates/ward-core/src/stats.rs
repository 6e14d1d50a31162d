use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    ids::WorkerId,
    model::IncidentStatus,
    time::EpochMs,
    types::Incident,
};

/// Aggregates backing the dashboards. Computed from a full read of the
/// store; every role's view is a projection of the same numbers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Overview {
    pub total: usize,
    pub pending: usize,
    pub assigned: usize,
    pub completed: usize,
    pub verified: usize,
    pub by_kind: BTreeMap<String, usize>,
    /// (completed + verified) / total; 0 when the store is empty.
    pub resolution_rate: f64,
}

pub fn overview(incidents: &[Incident]) -> Overview {
    let mut pending = 0;
    let mut assigned = 0;
    let mut completed = 0;
    let mut verified = 0;
    let mut by_kind: BTreeMap<String, usize> = BTreeMap::new();

    for i in incidents {
        match i.status {
            IncidentStatus::Pending => pending += 1,
            IncidentStatus::Assigned => assigned += 1,
            IncidentStatus::Completed => completed += 1,
            IncidentStatus::Verified => verified += 1,
        }
        *by_kind.entry(i.kind.as_str().to_string()).or_default() += 1;
    }

    let total = incidents.len();
    let resolution_rate = if total == 0 {
        0.0
    } else {
        (completed + verified) as f64 / total as f64
    };

    Overview {
        total,
        pending,
        assigned,
        completed,
        verified,
        by_kind,
        resolution_rate,
    }
}

/// The field worker's active queue: assigned to them and not yet completed.
pub fn worker_tasks<'a>(incidents: &'a [Incident], worker: &WorkerId) -> Vec<&'a Incident> {
    incidents
        .iter()
        .filter(|i| {
            i.status == IncidentStatus::Assigned && i.assigned_worker.as_ref() == Some(worker)
        })
        .collect()
}

/// Pending incidents that have sat untouched longer than `older_than_ms`.
pub fn stale_pending<'a>(
    incidents: &'a [Incident],
    now: EpochMs,
    older_than_ms: i64,
) -> Vec<&'a Incident> {
    incidents
        .iter()
        .filter(|i| {
            i.status == IncidentStatus::Pending && now - i.last_transition_ms > older_than_ms
        })
        .collect()
}
