//! Credential types
//!
//! Wire-compatible with the backend's token payloads (camelCase field
//! names).

use serde::{Deserialize, Serialize};

/// An access/refresh token pair for the active session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    /// Short-lived bearer token sent with each authorized request
    pub access_token: String,
    /// Longer-lived token exchanged for a new pair when the access token
    /// expires
    pub refresh_token: String,
}

impl Credential {
    /// Create a new credential pair
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Header value for the Authorization header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}
