//! In-memory credential store

use super::types::Credential;
use super::CredentialStore;
use std::sync::RwLock;

/// Credential store backed by a process-local cell.
///
/// State does not survive a restart; use `FileStore` when it must.
#[derive(Debug, Default)]
pub struct MemoryStore {
    cell: RwLock<Option<Credential>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with a credential
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            cell: RwLock::new(Some(credential)),
        }
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self) -> Option<Credential> {
        self.cell.read().expect("credential cell poisoned").clone()
    }

    fn set(&self, credential: Credential) {
        *self.cell.write().expect("credential cell poisoned") = Some(credential);
    }

    fn clear(&self) {
        *self.cell.write().expect("credential cell poisoned") = None;
    }
}
