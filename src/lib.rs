//! # Intake Client
//!
//! Client library for a legal-services intake backend: an authenticated
//! HTTP client with transparent bearer-token injection and a
//! single-retry-on-auth-failure token refresh protocol, plus typed
//! bindings for the intake API (applications, status tracking, admin
//! review).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use intake_client::{AuthClient, ClientConfig, IntakeApi, MemoryStore, Result};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = AuthClient::new(
//!         ClientConfig::new("https://api.example.com"),
//!         Arc::new(MemoryStore::new()),
//!     );
//!     let api = IntakeApi::new(client);
//!
//!     // React to forced logout (failed token refresh)
//!     api.session().on_invalidated(|| {
//!         // route to the login screen, drop in-memory user state, ...
//!     });
//!
//!     api.login("staff@example.com", "secret").await?;
//!     let page = api.list_applications(1).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Refresh protocol
//!
//! ```text
//! request -> send with stored bearer -> 2xx -----------------> Ok(response)
//!                 |
//!                 `- 401/403, not yet retried
//!                       |- store empty -----------------> Err(SessionExpired)
//!                       |- refresh ok: persist pair ----> resend once
//!                       `- refresh failed: clear store,
//!                          fire invalidation handlers --> Err(RefreshFailed)
//! ```
//!
//! A logical request is sent at most twice and triggers at most one
//! refresh call. Concurrent requests that expire together each refresh
//! independently; the store is last-writer-wins.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)] // TODO: document the api::types wire fields

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the client
pub mod error;

/// Credential storage (memory, file)
pub mod store;

/// Session invalidation signal
pub mod session;

/// Authenticated HTTP client with token refresh
pub mod http;

/// Typed bindings for the intake API
pub mod api;

// ============================================================================
// Re-exports
// ============================================================================

pub use api::IntakeApi;
pub use error::{Error, Result};
pub use http::{AuthClient, ClientConfig, RequestConfig};
pub use session::SessionEvents;
pub use store::{Credential, CredentialStore, FileStore, MemoryStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
