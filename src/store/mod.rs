//! Credential storage
//!
//! The client reads the store before every send and writes it only on a
//! successful refresh (or clears it on a failed one / explicit logout).
//! The store is a single mutable cell: exactly one credential is active at
//! a time and `set` replaces it wholesale.
//!
//! Backends: `MemoryStore` for tests and short-lived processes, `FileStore`
//! for persistence across restarts.

mod file;
mod memory;
mod types;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use types::Credential;

/// Pluggable persistence for the active credential pair.
///
/// All operations are synchronous from the client's perspective; backends
/// that need I/O (like `FileStore`) perform it inline. Last-writer-wins is
/// acceptable under concurrent refreshes because credentials are
/// re-derivable from the authentication backend.
pub trait CredentialStore: Send + Sync {
    /// Current credential, if a session exists
    fn get(&self) -> Option<Credential>;

    /// Replace the stored credential
    fn set(&self, credential: Credential);

    /// Remove the stored credential, ending the session
    fn clear(&self);
}
