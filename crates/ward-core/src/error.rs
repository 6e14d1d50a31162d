use thiserror::Error;

use crate::{ids::IncidentId, model::IncidentStatus};

/// Everything an operation can fail with. All variants are recoverable by
/// the caller; the engine itself never aborts.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum WorkflowError {
    #[error("incident {0} not found")]
    NotFound(IncidentId),

    /// The expected-status precondition no longer held: a concurrent caller
    /// transitioned the incident first. Re-read before retrying.
    #[error("incident {id} is {actual}, expected {expected}")]
    Conflict {
        id: IncidentId,
        expected: IncidentStatus,
        actual: IncidentStatus,
    },

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("collaborator unavailable: {0}")]
    Unavailable(String),
}

impl WorkflowError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unavailable<E: std::fmt::Display>(e: E) -> Self {
        Self::Unavailable(e.to_string())
    }
}
