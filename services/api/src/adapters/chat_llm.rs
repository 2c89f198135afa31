//! services/api/src/adapters/chat_llm.rs
//!
//! This module contains the adapter for the remote chat-completion service.
//! It implements the `ChatCompletionService` port from the `core` crate.

use async_trait::async_trait;
use lesson_assistant_core::{
    ports::{ChatCompletionService, PortError, PortResult},
    ChatRequest, Credential,
};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ChatCompletionService` against an OpenAI-compatible
/// `/chat/completions` endpoint.
#[derive(Clone)]
pub struct OpenAiChatAdapter {
    client: Client,
    endpoint: String,
}

impl OpenAiChatAdapter {
    /// Creates a new `OpenAiChatAdapter` posting to `<api_base>/chat/completions`.
    pub fn new(client: Client, api_base: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/chat/completions", api_base.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

//=========================================================================================
// Response Shapes
//=========================================================================================

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatMessageResponse>,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

//=========================================================================================
// `ChatCompletionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ChatCompletionService for OpenAiChatAdapter {
    async fn complete(&self, credential: &Credential, request: &ChatRequest) -> PortResult<String> {
        debug!(endpoint = %self.endpoint, model = %request.model, "Posting chat completion.");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(credential.expose())
            .json(request)
            .send()
            .await
            .map_err(|e| PortError::transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| PortError::transport(e.to_string()))?;

        if !status.is_success() {
            // Prefer the service's own message; fall back to the status text.
            let detail = serde_json::from_slice::<ErrorEnvelope>(&body)
                .ok()
                .and_then(|envelope| envelope.error)
                .and_then(|error| error.message)
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or(status.as_str())
                        .to_string()
                });
            warn!(status = status.as_u16(), "Chat service rejected the request: {}", detail);
            return Err(PortError::Rejected(detail));
        }

        let parsed: ChatResponse = serde_json::from_slice(&body).map_err(|e| {
            warn!("Chat service returned an unreadable body: {}", e);
            PortError::UnexpectedFormat
        })?;

        // The first choice's content, untouched.
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or(PortError::UnexpectedFormat)
    }
}
