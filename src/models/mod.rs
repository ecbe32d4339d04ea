// src/models/mod.rs

//! Domain models for the monitor application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod credentials;
mod snapshot;
mod task;

// Re-export all public types
pub use config::{AuthConfig, Config, NotifyConfig, ScheduleConfig, SourceConfig};
pub use credentials::CredentialBundle;
pub use snapshot::{CategorySnapshot, Snapshot};
pub use task::TaskRecord;
