//! Authentication recovery.
//!
//! When the source rejects the credential bundle, polling pauses and the
//! controller repeatedly reloads the bundle from its configured source
//! until the operator has supplied a corrected one. A reload that yields
//! the rejected bundle again is not a correction and keeps the wait going.
//! No source fetches happen during the wait, and the process never
//! terminates on auth failure, so accumulated snapshot state survives.

use std::fmt;
use std::time::Duration;

use crate::models::CredentialBundle;
use crate::services::{CredentialSource, Notifier};

const EXPIRY_TITLE: &str = "[taskwatch] Auth parameters expired";
const EXPIRY_BODY: &str =
    "The source rejected the auth parameters. Update the credential variable \
     (uuid#token#noncestr#sign); polling resumes automatically once it is valid.";

/// Controller state. There is no terminal state; the machine loops
/// `Running -> AwaitingCredentials -> Running` for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryState {
    Running,
    AwaitingCredentials,
}

impl fmt::Display for RecoveryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryState::Running => write!(f, "running"),
            RecoveryState::AwaitingCredentials => write!(f, "awaiting-credentials"),
        }
    }
}

/// Blocks a failed cycle until corrected credentials become available.
pub struct AuthRecovery<'a> {
    credentials: &'a dyn CredentialSource,
    notifier: &'a dyn Notifier,
    retry_delay: Duration,
}

impl<'a> AuthRecovery<'a> {
    pub fn new(
        credentials: &'a dyn CredentialSource,
        notifier: &'a dyn Notifier,
        retry_delay: Duration,
    ) -> Self {
        Self {
            credentials,
            notifier,
            retry_delay,
        }
    }

    /// Handle one auth rejection: notify the operator once, then poll the
    /// credential source until it yields a corrected bundle.
    ///
    /// The source just rejected `rejected`, so reloading the same bundle is
    /// not a correction; the wait continues, paced by the retry delay, until
    /// the operator has replaced it. The returned bundle swaps in whole at
    /// the call site; a malformed or unchanged reload never touches the
    /// active bundle.
    pub async fn recover(&self, rejected: &CredentialBundle) -> CredentialBundle {
        let mut state = RecoveryState::AwaitingCredentials;
        log::warn!("Auth rejected by source, state -> {state}");
        self.notifier.notify(EXPIRY_TITLE, EXPIRY_BODY).await;

        loop {
            match self.credentials.load() {
                Ok(bundle) if bundle != *rejected => {
                    state = RecoveryState::Running;
                    log::info!("Credentials reloaded, state -> {state}");
                    return bundle;
                }
                Ok(_) => {
                    log::warn!(
                        "Credentials unchanged since rejection, retrying in {}s",
                        self.retry_delay.as_secs()
                    );
                }
                Err(e) => {
                    log::warn!(
                        "Credential reload failed ({}), retrying in {}s",
                        e,
                        self.retry_delay.as_secs()
                    );
                }
            }
            tokio::time::sleep(self.retry_delay).await;
        }
    }
}
