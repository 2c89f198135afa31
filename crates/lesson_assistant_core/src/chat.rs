//! crates/lesson_assistant_core/src/chat.rs
//!
//! Builds the chat-completion request for a question about one content block.

use crate::domain::ContentBlock;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_MAX_TOKENS: u32 = 300;

//=========================================================================================
// Wire Types
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ChatMessage {
    System { content: String },
    User { content: UserContent },
}

/// A user turn is either plain text or a list of typed parts (text plus image).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

//=========================================================================================
// Request Policy
//=========================================================================================

/// Model and length cap sent with every request, whatever the block kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPolicy {
    pub model: String,
    pub max_tokens: u32,
}

impl Default for RequestPolicy {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl RequestPolicy {
    /// Always exactly two messages: the system persona, then the user turn.
    pub fn build_request(
        &self,
        system_prompt: &str,
        block: &ContentBlock,
        question: &str,
    ) -> ChatRequest {
        let system = if system_prompt.is_empty() {
            DEFAULT_SYSTEM_PROMPT.to_string()
        } else {
            system_prompt.to_string()
        };

        let user = match block {
            ContentBlock::Image(source) => UserContent::Parts(vec![
                ContentPart::Text {
                    text: question.to_string(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: source.as_str().to_string(),
                    },
                },
            ]),
            _ => UserContent::Text(format!(
                "Context: {}\n\nQuestion: {}",
                block.value(),
                question
            )),
        };

        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::System { content: system },
                ChatMessage::User { content: user },
            ],
            max_tokens: self.max_tokens,
        }
    }
}

impl ChatRequest {
    #[cfg(test)]
    pub(crate) fn user_content(&self) -> Option<&UserContent> {
        self.messages.iter().find_map(|message| match message {
            ChatMessage::User { content } => Some(content),
            ChatMessage::System { .. } => None,
        })
    }
}

//=========================================================================================
// Quick Actions
//=========================================================================================

/// Canned questions offered next to every block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    Translate,
    ExplainSimply,
    FindSources,
    GenerateExercise,
    ChallengeThesis,
    /// Anything not recognised.
    ExplainFurther,
}

impl QuickAction {
    pub fn from_code(code: &str) -> Self {
        match code {
            "translate" => QuickAction::Translate,
            "explain" => QuickAction::ExplainSimply,
            "sources" => QuickAction::FindSources,
            "exercise" => QuickAction::GenerateExercise,
            "challenge" => QuickAction::ChallengeThesis,
            _ => QuickAction::ExplainFurther,
        }
    }

    pub fn question(&self) -> &'static str {
        match self {
            QuickAction::Translate => {
                "Translate this content to the language I specified during login."
            }
            QuickAction::ExplainSimply => "Explain this content as if I were a 5-year-old.",
            QuickAction::FindSources => "Can you provide a few other sources on this topic?",
            QuickAction::GenerateExercise => {
                "Give me a question or exercise to reinforce this knowledge."
            }
            QuickAction::ChallengeThesis => "Act as an expert trying to challenge this thesis.",
            QuickAction::ExplainFurther => "Can you explain this further?",
        }
    }
}
