// src/services/credentials.rs

//! Credential bundle loading.
//!
//! The recovery controller polls a `CredentialSource` while waiting for the
//! operator to supply a corrected bundle, so the source is a trait rather
//! than a direct environment read.

use crate::error::{AppError, Result};
use crate::models::CredentialBundle;

/// Where the `uuid#token#noncestr#sign` bundle comes from.
pub trait CredentialSource: Send + Sync {
    /// Load and parse the current bundle.
    fn load(&self) -> Result<CredentialBundle>;
}

/// Reads the bundle from an environment variable on every call.
///
/// The hosting panel updates the variable in place, so a re-read picks up
/// operator corrections without a restart.
pub struct EnvCredentialSource {
    var_name: String,
}

impl EnvCredentialSource {
    pub fn new(var_name: impl Into<String>) -> Self {
        Self {
            var_name: var_name.into(),
        }
    }
}

impl CredentialSource for EnvCredentialSource {
    fn load(&self) -> Result<CredentialBundle> {
        let raw = std::env::var(&self.var_name).map_err(|_| {
            AppError::credential(format!(
                "environment variable {} is not set; expected uuid#token#noncestr#sign",
                self.var_name
            ))
        })?;
        CredentialBundle::parse(&raw)
    }
}
