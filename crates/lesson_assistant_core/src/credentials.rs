//! crates/lesson_assistant_core/src/credentials.rs
//!
//! Holds the one secret used for remote requests and mirrors it into a durable slot.

use crate::domain::Credential;
use crate::ports::{CredentialSlot, PortResult};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

pub struct CredentialStore {
    slot: Arc<dyn CredentialSlot>,
    current: RwLock<Option<Credential>>,
}

impl CredentialStore {
    /// Reads whatever the slot holds. An empty stored value counts as absent.
    pub fn restore(slot: Arc<dyn CredentialSlot>) -> PortResult<Self> {
        let current = slot.load()?.and_then(Credential::new);
        debug!(restored = current.is_some(), "Credential slot read.");
        Ok(Self {
            slot,
            current: RwLock::new(current),
        })
    }

    pub fn get(&self) -> Option<Credential> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Writes the slot and the in-memory value under one lock.
    ///
    /// If the slot write fails the in-memory value is left untouched.
    pub fn set(&self, secret: &str) -> PortResult<()> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        match Credential::new(secret) {
            Some(credential) => {
                self.slot.store(secret)?;
                *current = Some(credential);
                info!("Credential stored.");
            }
            None => {
                self.slot.remove()?;
                *current = None;
                info!("Empty credential supplied; slot cleared.");
            }
        }
        Ok(())
    }

    pub fn clear(&self) -> PortResult<()> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        self.slot.remove()?;
        *current = None;
        info!("Credential cleared.");
        Ok(())
    }
}
