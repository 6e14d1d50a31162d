use std::collections::BTreeMap;
use std::sync::Mutex;

use ward_core::{
    now_ms, transition, Incident, IncidentDraft, IncidentFilter, IncidentId, IncidentStatus,
    Transition,
};

use crate::{error::StoreError, traits::IncidentStore};

/// In-memory store. Not durable, but exactly as safe under concurrency as
/// the sqlite store: the compare-and-transition check runs under the lock.
/// Used by tests and the daemon's --in-memory mode.
#[derive(Default)]
pub struct MemStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    incidents: BTreeMap<i64, Incident>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IncidentStore for MemStore {
    fn create(&self, draft: IncidentDraft) -> Result<Incident, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let incident = draft.into_incident(IncidentId(inner.next_id), now_ms());
        inner.incidents.insert(incident.id.0, incident.clone());
        Ok(incident)
    }

    fn get(&self, id: IncidentId) -> Result<Incident, StoreError> {
        let inner = self.inner.lock().unwrap();
        inner
            .incidents
            .get(&id.0)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn list(&self, filter: &IncidentFilter) -> Result<Vec<Incident>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .incidents
            .values()
            .filter(|i| filter.matches(i))
            .cloned()
            .collect())
    }

    fn compare_and_transition(
        &self,
        id: IncidentId,
        expected: IncidentStatus,
        t: &Transition,
    ) -> Result<Incident, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let current = inner.incidents.get(&id.0).ok_or(StoreError::NotFound(id))?;
        if current.status != expected {
            return Err(StoreError::Conflict {
                id,
                expected,
                actual: current.status,
            });
        }
        let next = transition::apply(current, t, now_ms());
        inner.incidents.insert(id.0, next.clone());
        Ok(next)
    }
}
