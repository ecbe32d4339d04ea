//! Change-detection and polling engine.
//!
//! - `diff`: compare a persisted category snapshot with fresh items
//! - `schedule`: interval policy keyed on the local wall-clock hour
//! - `recovery`: pause-and-reload state machine for expired credentials
//! - `poll`: the cycle driver (fetch, diff, notify, persist, sleep)

pub mod diff;
pub mod poll;
pub mod recovery;
pub mod schedule;

pub use diff::{DiffResult, TaskUpdate, calculate_diff};
pub use poll::Monitor;
pub use recovery::{AuthRecovery, RecoveryState};
pub use schedule::Schedule;
