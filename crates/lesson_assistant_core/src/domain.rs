//! crates/lesson_assistant_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! Lessons, their typed content blocks, the session role and the credential.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

//=========================================================================================
// Identifiers
//=========================================================================================

/// Identifier assigned by the lesson store when a lesson is appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LessonId(pub u64);

impl fmt::Display for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//=========================================================================================
// Content Blocks
//=========================================================================================

/// The four kinds of content a lesson can be made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Text,
    Video,
    Audio,
    Image,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Text => "text",
            BlockKind::Video => "video",
            BlockKind::Audio => "audio",
            BlockKind::Image => "image",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an image block's pixels come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A remote URL.
    Url(String),
    /// An inline `data:` URI produced from an uploaded file.
    Inline(String),
}

impl ImageSource {
    pub fn as_str(&self) -> &str {
        match self {
            ImageSource::Url(value) | ImageSource::Inline(value) => value,
        }
    }
}

/// Validation failures when a block is constructed from a kind and a raw value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentBlockError {
    #[error("A {0} block cannot be empty")]
    Empty(BlockKind),
    #[error("Inline image data must be a `data:` URI carrying a payload")]
    MalformedInlineImage,
}

/// One ordered piece of a lesson.
///
/// On the wire a block is `{ "type": "<kind>", "value": "<string>" }`; deserializing
/// goes through [`ContentBlock::new`] so every block in the system is validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBlock", into = "RawBlock")]
pub enum ContentBlock {
    /// Raw markdown.
    Text(String),
    /// A playable video URL.
    Video(String),
    /// A playable audio URL.
    Audio(String),
    Image(ImageSource),
}

impl ContentBlock {
    pub fn new(kind: BlockKind, value: impl Into<String>) -> Result<Self, ContentBlockError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ContentBlockError::Empty(kind));
        }

        Ok(match kind {
            BlockKind::Text => ContentBlock::Text(value),
            BlockKind::Video => ContentBlock::Video(value),
            BlockKind::Audio => ContentBlock::Audio(value),
            BlockKind::Image => {
                if value.starts_with("data:") {
                    match value.split_once(',') {
                        Some((_, payload)) if !payload.is_empty() => {
                            ContentBlock::Image(ImageSource::Inline(value))
                        }
                        _ => return Err(ContentBlockError::MalformedInlineImage),
                    }
                } else {
                    ContentBlock::Image(ImageSource::Url(value))
                }
            }
        })
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            ContentBlock::Text(_) => BlockKind::Text,
            ContentBlock::Video(_) => BlockKind::Video,
            ContentBlock::Audio(_) => BlockKind::Audio,
            ContentBlock::Image(_) => BlockKind::Image,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            ContentBlock::Text(value) | ContentBlock::Video(value) | ContentBlock::Audio(value) => {
                value
            }
            ContentBlock::Image(source) => source.as_str(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawBlock {
    #[serde(rename = "type")]
    kind: BlockKind,
    value: String,
}

impl TryFrom<RawBlock> for ContentBlock {
    type Error = ContentBlockError;

    fn try_from(raw: RawBlock) -> Result<Self, Self::Error> {
        ContentBlock::new(raw.kind, raw.value)
    }
}

impl From<ContentBlock> for RawBlock {
    fn from(block: ContentBlock) -> Self {
        RawBlock {
            kind: block.kind(),
            value: block.value().to_string(),
        }
    }
}

//=========================================================================================
// Lessons
//=========================================================================================

/// What the authoring side hands to the store. The id is never part of a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LessonDraft {
    pub title: String,
    pub system_prompt: String,
    pub content: Vec<ContentBlock>,
}

/// A lesson owned by the store. Read-only once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    id: LessonId,
    title: String,
    system_prompt: String,
    content: Vec<ContentBlock>,
    created_at: DateTime<Utc>,
}

impl Lesson {
    pub(crate) fn from_draft(id: LessonId, draft: LessonDraft) -> Self {
        Self {
            id,
            title: draft.title,
            system_prompt: draft.system_prompt,
            content: draft.content,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> LessonId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// May be empty; the chat request then falls back to the default persona.
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn content(&self) -> &[ContentBlock] {
        &self.content
    }

    pub fn block(&self, index: usize) -> Option<&ContentBlock> {
        self.content.get(index)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn summary(&self) -> LessonSummary {
        LessonSummary {
            id: self.id,
            title: self.title.clone(),
            block_count: self.content.len(),
            kinds: self
                .content
                .iter()
                .map(|block| block.kind().as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// A one-line overview used by the lesson list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonSummary {
    pub id: LessonId,
    pub title: String,
    pub block_count: usize,
    /// Block kinds in lesson order, e.g. `"text, video, image"`.
    pub kinds: String,
}

//=========================================================================================
// Session Types
//=========================================================================================

/// Which surface a logged-in session may reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn toggled(self) -> Self {
        match self {
            Role::Admin => Role::User,
            Role::User => Role::Admin,
        }
    }
}

/// The secret sent as a bearer token to the chat-completion service.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Returns `None` for an empty secret, which counts as absent.
    pub fn new(secret: impl Into<String>) -> Option<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            None
        } else {
            Some(Self(secret))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Per-block question state inside a viewing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QaEntry {
    Pending,
    /// Either the model's reply or an `Error: ...` line.
    Answered(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_reject_empty_values() {
        assert_eq!(
            ContentBlock::new(BlockKind::Video, "   "),
            Err(ContentBlockError::Empty(BlockKind::Video))
        );
    }

    #[test]
    fn image_blocks_distinguish_urls_from_inline_data() {
        let url = ContentBlock::new(BlockKind::Image, "https://example.com/cat.png").unwrap();
        assert_eq!(
            url,
            ContentBlock::Image(ImageSource::Url("https://example.com/cat.png".into()))
        );

        let inline = ContentBlock::new(BlockKind::Image, "data:image/png;base64,iVBORw0").unwrap();
        assert!(matches!(inline, ContentBlock::Image(ImageSource::Inline(_))));

        assert_eq!(
            ContentBlock::new(BlockKind::Image, "data:image/png;base64,"),
            Err(ContentBlockError::MalformedInlineImage)
        );
    }

    #[test]
    fn blocks_use_type_and_value_on_the_wire() {
        let block: ContentBlock =
            serde_json::from_str(r##"{"type":"text","value":"# Heading"}"##).unwrap();
        assert_eq!(block, ContentBlock::Text("# Heading".into()));

        let json = serde_json::to_value(ContentBlock::Audio("https://a.example/x.mp3".into())).unwrap();
        assert_eq!(json["type"], "audio");
        assert_eq!(json["value"], "https://a.example/x.mp3");

        assert!(serde_json::from_str::<ContentBlock>(r#"{"type":"image","value":""}"#).is_err());
        assert!(serde_json::from_str::<ContentBlock>(r#"{"type":"slides","value":"x"}"#).is_err());
    }

    #[test]
    fn summary_lists_block_kinds_in_order() {
        let lesson = Lesson::from_draft(
            LessonId(7),
            LessonDraft {
                title: "Cells".into(),
                system_prompt: String::new(),
                content: vec![
                    ContentBlock::Text("Cells are small.".into()),
                    ContentBlock::Image(ImageSource::Url("https://example.com/cell.png".into())),
                ],
            },
        );

        let summary = lesson.summary();
        assert_eq!(summary.block_count, 2);
        assert_eq!(summary.kinds, "text, image");
    }

    #[test]
    fn credential_debug_is_redacted() {
        let credential = Credential::new("sk-secret").unwrap();
        assert_eq!(format!("{credential:?}"), "Credential(***)");
        assert!(Credential::new("").is_none());
    }

    #[test]
    fn role_toggles() {
        assert_eq!(Role::Admin.toggled(), Role::User);
        assert_eq!(Role::User.toggled(), Role::Admin);
    }
}
