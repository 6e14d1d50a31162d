use thiserror::Error;

use ward_core::{IncidentId, IncidentStatus, WorkflowError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("incident {0} not found")]
    NotFound(IncidentId),

    #[error("incident {id} is {actual}, expected {expected}")]
    Conflict {
        id: IncidentId,
        expected: IncidentStatus,
        actual: IncidentStatus,
    },

    #[error("storage backend: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend<E: std::fmt::Display>(e: E) -> Self {
        Self::Backend(e.to_string())
    }
}

impl From<StoreError> for WorkflowError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => WorkflowError::NotFound(id),
            StoreError::Conflict {
                id,
                expected,
                actual,
            } => WorkflowError::Conflict {
                id,
                expected,
                actual,
            },
            StoreError::Backend(msg) => WorkflowError::Unavailable(msg),
        }
    }
}
