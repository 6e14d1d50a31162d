use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the UNIX epoch. Signed so arithmetic on cutoffs and
/// ages stays in one type.
pub type EpochMs = i64;

pub fn now_ms() -> EpochMs {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as EpochMs
}
