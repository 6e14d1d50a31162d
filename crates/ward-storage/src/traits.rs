use ward_core::{Incident, IncidentDraft, IncidentFilter, IncidentId, IncidentStatus, Transition};

use crate::error::StoreError;

/// The durable record of every incident; single source of truth.
///
/// `compare_and_transition` is the only mutator after creation. Every caller
/// must express its change as "apply iff the incident still holds the status
/// I last observed". That per-record optimistic check is what keeps the
/// engine safe under concurrent admins, workers, and detectors.
pub trait IncidentStore: Send + Sync {
    /// Persist a new incident: assigns the next id, stamps timestamps,
    /// status = pending. All-or-nothing; no partial record on failure.
    fn create(&self, draft: IncidentDraft) -> Result<Incident, StoreError>;

    fn get(&self, id: IncidentId) -> Result<Incident, StoreError>;

    /// Filtered read. Results are ordered by id. Never observes a
    /// half-applied transition.
    fn list(&self, filter: &IncidentFilter) -> Result<Vec<Incident>, StoreError>;

    /// Apply `transition` iff the stored status equals `expected`; otherwise
    /// fail with `Conflict` carrying the actual status. Atomic per record.
    fn compare_and_transition(
        &self,
        id: IncidentId,
        expected: IncidentStatus,
        transition: &Transition,
    ) -> Result<Incident, StoreError>;
}
