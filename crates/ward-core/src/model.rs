use serde::{Deserialize, Serialize};

use crate::types::Incident;

/// Lifecycle status of an incident. Moves forward along
/// pending -> assigned -> completed -> verified, with the single backward
/// edge completed -> pending on rejection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    Pending,
    Assigned,
    Completed,
    Verified,
}

impl IncidentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentStatus::Pending => "pending",
            IncidentStatus::Assigned => "assigned",
            IncidentStatus::Completed => "completed",
            IncidentStatus::Verified => "verified",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(IncidentStatus::Pending),
            "assigned" => Some(IncidentStatus::Assigned),
            "completed" => Some(IncidentStatus::Completed),
            "verified" => Some(IncidentStatus::Verified),
            _ => None,
        }
    }

    /// Verified is the only terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, IncidentStatus::Verified)
    }
}

impl std::fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyDecision {
    Approve,
    Reject,
}

/// Result of screening a detection frame: either an incident was opened or
/// the frame was clean. "No anomaly" is a first-class answer, not an error.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum IntakeOutcome {
    Opened { incident: Incident },
    NoAnomaly,
}
