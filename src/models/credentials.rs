//! Credential bundle parsing.

use crate::error::{AppError, Result};

/// The four correlated auth parameters captured from the partner app.
///
/// A bundle is only ever replaced as a whole; partial replacement is
/// rejected at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialBundle {
    pub uuid: String,
    pub token: String,
    pub noncestr: String,
    pub sign: String,
}

impl CredentialBundle {
    /// Parse a `uuid#token#noncestr#sign` value, order-significant.
    ///
    /// Anything other than exactly four `#`-delimited fields is rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let parts: Vec<&str> = raw.split('#').collect();
        if parts.len() != 4 {
            return Err(AppError::credential(format!(
                "expected uuid#token#noncestr#sign (4 fields), got {} field(s)",
                parts.len()
            )));
        }

        Ok(Self {
            uuid: parts[0].to_string(),
            token: parts[1].to_string(),
            noncestr: parts[2].to_string(),
            sign: parts[3].to_string(),
        })
    }
}
