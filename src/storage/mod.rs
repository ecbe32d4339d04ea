//! Storage abstraction for snapshot persistence.
//!
//! The whole state is one JSON document: category key → (task id → record).
//! It is rewritten in full after each category is processed, last-writer-wins.

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Snapshot;

// Re-export for convenience
pub use local::LocalStore;

/// Trait for snapshot storage backends.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the persisted snapshot.
    ///
    /// A missing or unreadable document yields an empty snapshot, never an
    /// error; corruption is treated as "no state".
    async fn load(&self) -> Result<Snapshot>;

    /// Overwrite the persisted snapshot.
    ///
    /// A crash mid-write must leave the previous valid document intact.
    async fn save(&self, snapshot: &Snapshot) -> Result<()>;
}
