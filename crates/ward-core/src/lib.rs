//! Shared model + pure workflow rules for the ward daemon and tools.
//!
//! This crate is the functional core: no I/O, no clocks of its own. The
//! storage and daemon crates are the imperative shell that applies these
//! rules to durable state.

pub mod detect;
pub mod error;
pub mod ids;
pub mod model;
pub mod stats;
pub mod time;
pub mod transition;
pub mod types;

pub use detect::*;
pub use error::*;
pub use ids::*;
pub use model::*;
pub use stats::*;
pub use time::*;
pub use transition::*;
pub use types::*;
