//! The incident lifecycle operations: intake, dispatch, completion,
//! verification, and the read side. Each operation is a single
//! compare-and-transition against the store; losers of a concurrent race get
//! a Conflict back and decide for themselves whether to re-read and retry.

pub mod complete;
pub mod dispatch;
pub mod intake;
pub mod query;
pub mod verify;
