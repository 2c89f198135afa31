//! services/api/src/adapters/credential_file.rs
//!
//! A JSON file holding the single named credential slot.
//! It implements the `CredentialSlot` port from the `core` crate.

use lesson_assistant_core::ports::{CredentialSlot, PortError, PortResult};
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The key the credential is stored under.
pub const CREDENTIAL_KEY: &str = "apiKey";

#[derive(Clone, Debug)]
pub struct FileCredentialSlot {
    path: PathBuf,
}

impl FileCredentialSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[cfg(test)]
    fn path(&self) -> &Path {
        &self.path
    }
}

fn storage_error(path: &Path, e: impl std::fmt::Display) -> PortError {
    PortError::Storage(format!("{}: {}", path.display(), e))
}

impl CredentialSlot for FileCredentialSlot {
    fn load(&self) -> PortResult<Option<String>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(storage_error(&self.path, e)),
        };

        let slot: Map<String, Value> =
            serde_json::from_str(&raw).map_err(|e| storage_error(&self.path, e))?;
        Ok(slot
            .get(CREDENTIAL_KEY)
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    fn store(&self, secret: &str) -> PortResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| storage_error(parent, e))?;
        }

        let mut slot = Map::new();
        slot.insert(CREDENTIAL_KEY.to_string(), Value::String(secret.to_string()));
        let json = serde_json::to_string(&slot).map_err(|e| storage_error(&self.path, e))?;
        std::fs::write(&self.path, json).map_err(|e| storage_error(&self.path, e))?;
        debug!(path = %self.path.display(), "Credential slot written.");
        Ok(())
    }

    fn remove(&self) -> PortResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Credential slot removed.");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error(&self.path, e)),
        }
    }
}
