//! crates/lesson_assistant_core/src/session.rs
//!
//! The explicitly passed session context: who is logged in, in which role, and
//! with which credential.

use crate::credentials::CredentialStore;
use crate::domain::{Credential, Role};
use crate::ports::{CredentialSlot, PortError};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("No user is logged in")]
    NotLoggedIn,
    #[error(transparent)]
    Port(#[from] PortError),
}

pub struct SessionContext {
    credentials: Arc<CredentialStore>,
    role: RwLock<Option<Role>>,
}

impl SessionContext {
    /// Restores the session from the durable slot.
    ///
    /// Only the credential is persisted, so a restored session comes back with
    /// the `User` role.
    pub fn restore(slot: Arc<dyn CredentialSlot>) -> Result<Self, SessionError> {
        let credentials = Arc::new(CredentialStore::restore(slot)?);
        let role = credentials.get().map(|_| Role::User);
        if role.is_some() {
            info!("Restored a previous session.");
        }
        Ok(Self {
            credentials,
            role: RwLock::new(role),
        })
    }

    pub fn login(&self, role: Role, secret: &str) -> Result<(), SessionError> {
        let mut current = self.role.write().unwrap_or_else(PoisonError::into_inner);
        self.credentials.set(secret)?;
        *current = Some(role);
        info!(?role, "Logged in.");
        Ok(())
    }

    pub fn logout(&self) -> Result<(), SessionError> {
        let mut current = self.role.write().unwrap_or_else(PoisonError::into_inner);
        self.credentials.clear()?;
        *current = None;
        info!("Logged out.");
        Ok(())
    }

    pub fn switch_role(&self) -> Result<Role, SessionError> {
        let mut current = self.role.write().unwrap_or_else(PoisonError::into_inner);
        let next = current.ok_or(SessionError::NotLoggedIn)?.toggled();
        *current = Some(next);
        info!(role = ?next, "Switched role.");
        Ok(next)
    }

    pub fn role(&self) -> Option<Role> {
        *self.role.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_logged_in(&self) -> bool {
        self.role().is_some()
    }

    pub fn credential(&self) -> Option<Credential> {
        self.credentials.get()
    }

    pub fn credentials(&self) -> Arc<CredentialStore> {
        self.credentials.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::testing::MemorySlot;

    #[test]
    fn fresh_session_is_logged_out() {
        let session = SessionContext::restore(Arc::new(MemorySlot::default())).unwrap();
        assert!(!session.is_logged_in());
        assert!(session.credential().is_none());
        assert!(matches!(session.switch_role(), Err(SessionError::NotLoggedIn)));
    }

    #[test]
    fn stored_credential_restores_a_user_session() {
        let session = SessionContext::restore(Arc::new(MemorySlot::holding("sk-9"))).unwrap();
        assert_eq!(session.role(), Some(Role::User));
        assert_eq!(session.credential().unwrap().expose(), "sk-9");
    }

    #[test]
    fn login_switch_and_logout() {
        let slot = Arc::new(MemorySlot::default());
        let session = SessionContext::restore(slot.clone()).unwrap();

        session.login(Role::Admin, "sk-admin").unwrap();
        assert_eq!(session.role(), Some(Role::Admin));
        assert_eq!(slot.read().as_deref(), Some("sk-admin"));

        assert_eq!(session.switch_role().unwrap(), Role::User);
        assert_eq!(session.role(), Some(Role::User));

        session.logout().unwrap();
        assert_eq!(session.role(), None);
        assert!(session.credential().is_none());
        assert_eq!(slot.read(), None);
    }
}
