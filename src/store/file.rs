//! File-backed credential store
//!
//! JSON file persistence with atomic writes (temp file then rename), so a
//! crash mid-write never leaves a torn credential on disk.

use super::types::Credential;
use super::CredentialStore;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::warn;

/// Credential store persisted to a JSON file.
///
/// The credential is cached in memory and written through on every `set`
/// / `clear`, so `get` never touches the filesystem after `open`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    cell: RwLock<Option<Credential>>,
}

impl FileStore {
    /// Open a store at the given path, loading the existing credential if
    /// the file is present
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let credential = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| Error::store(format!("Failed to read credential file: {e}")))?;
            Some(
                serde_json::from_str(&contents)
                    .map_err(|e| Error::store(format!("Failed to parse credential file: {e}")))?,
            )
        } else {
            None
        };

        Ok(Self {
            path,
            cell: RwLock::new(credential),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, credential: &Credential) -> Result<()> {
        let contents = serde_json::to_string_pretty(credential)?;

        // Write to temp file first, then rename for atomicity
        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, &contents)
            .map_err(|e| Error::store(format!("Failed to write credential file: {e}")))?;
        std::fs::rename(&temp_path, &self.path)
            .map_err(|e| Error::store(format!("Failed to rename credential file: {e}")))?;

        Ok(())
    }

    fn remove(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::store(format!(
                "Failed to remove credential file: {e}"
            ))),
        }
    }
}

impl CredentialStore for FileStore {
    fn get(&self) -> Option<Credential> {
        self.cell.read().expect("credential cell poisoned").clone()
    }

    fn set(&self, credential: Credential) {
        if let Err(e) = self.persist(&credential) {
            warn!("Credential persistence failed, keeping in-memory copy: {e}");
        }
        *self.cell.write().expect("credential cell poisoned") = Some(credential);
    }

    fn clear(&self) {
        if let Err(e) = self.remove() {
            warn!("Credential file removal failed: {e}");
        }
        *self.cell.write().expect("credential cell poisoned") = None;
    }
}
