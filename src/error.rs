//! Error types for the intake client
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for the intake client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Transport Errors
    // ============================================================================
    /// Transport-level failure, no HTTP response was received. The client
    /// does not retry these; handling is left to the caller.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Session / Refresh Errors
    // ============================================================================
    /// An auth failure was received but no credential is stored, so a
    /// refresh is impossible. Equivalent to a logged-out session.
    #[error("Session expired: no stored credential to refresh with")]
    SessionExpired,

    /// The refresh endpoint rejected the exchange or was unreachable.
    /// Always accompanied by credential store clearing and session
    /// invalidation.
    #[error("Token refresh failed: {message}")]
    RefreshFailed { message: String },

    // ============================================================================
    // Upstream Errors
    // ============================================================================
    /// A non-2xx response outside the auth-failure set, passed through
    /// with its status and body untouched.
    #[error("HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    // ============================================================================
    // Persistence Errors
    // ============================================================================
    #[error("Credential store error: {message}")]
    Store { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Serialization Errors
    // ============================================================================
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a refresh failure error
    pub fn refresh_failed(message: impl Into<String>) -> Self {
        Self::RefreshFailed {
            message: message.into(),
        }
    }

    /// Create an upstream status error
    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            body: body.into(),
        }
    }

    /// Create a credential store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Check if this error terminated the session (the application should
    /// treat it as a logout and route to authentication)
    pub fn is_session_terminal(&self) -> bool {
        matches!(self, Error::SessionExpired | Error::RefreshFailed { .. })
    }

    /// Upstream status code, if this error carries one
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for the intake client
pub type Result<T> = std::result::Result<T, Error>;
