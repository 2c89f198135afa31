//! crates/lesson_assistant_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the chat-completion transport and of where the credential
//! is persisted.

use crate::chat::ChatRequest;
use crate::domain::Credential;
use async_trait::async_trait;

/// Used when a transport failure carries no message of its own.
pub const TRANSPORT_FALLBACK_MESSAGE: &str = "An unexpected error occurred. Please try again.";

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
///
/// The `Display` text of each variant is exactly what follows `Error: ` in an
/// answer string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    /// A non-2xx reply. Holds the service's own message, or the status text.
    #[error("API Error: {0}")]
    Rejected(String),
    /// A 2xx reply without a usable first choice.
    #[error("Unexpected API response format")]
    UnexpectedFormat,
    /// Anything else that went wrong on the way to or from the service.
    #[error("{0}")]
    Transport(String),
    /// The durable credential slot could not be read or written.
    #[error("Credential storage error: {0}")]
    Storage(String),
}

impl PortError {
    pub fn transport(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            PortError::Transport(TRANSPORT_FALLBACK_MESSAGE.to_string())
        } else {
            PortError::Transport(message)
        }
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait ChatCompletionService: Send + Sync {
    /// Sends one chat-completion request and returns the first choice's content verbatim.
    async fn complete(&self, credential: &Credential, request: &ChatRequest) -> PortResult<String>;
}

/// A single named key-value slot in local persistent storage.
pub trait CredentialSlot: Send + Sync {
    fn load(&self) -> PortResult<Option<String>>;
    fn store(&self, secret: &str) -> PortResult<()>;
    fn remove(&self) -> PortResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_texts_match_the_answer_format() {
        assert_eq!(
            PortError::Rejected("bad key".into()).to_string(),
            "API Error: bad key"
        );
        assert_eq!(
            PortError::UnexpectedFormat.to_string(),
            "Unexpected API response format"
        );
        assert_eq!(
            PortError::transport("  ").to_string(),
            TRANSPORT_FALLBACK_MESSAGE
        );
        assert_eq!(
            PortError::transport("connection refused").to_string(),
            "connection refused"
        );
    }
}
