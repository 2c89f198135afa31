//! services/api/src/web/protocol.rs
//!
//! Request and response bodies exchanged with the authoring and viewing front-ends.

use chrono::{DateTime, Utc};
use lesson_assistant_core::{BlockKind, ContentBlock, Lesson, LessonSummary, QaEntry, Role};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

//=========================================================================================
// Session
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(value_type = String, example = "admin")]
    pub role: Role,
    pub api_key: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, PartialEq)]
pub struct SessionResponse {
    pub logged_in: bool,
    #[schema(value_type = Option<String>, example = "user")]
    pub role: Option<Role>,
}

//=========================================================================================
// Lessons
//=========================================================================================

/// A block as typed into the editor. Validated when the lesson is created.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct BlockBody {
    #[serde(rename = "type")]
    #[schema(value_type = String, example = "text")]
    pub kind: BlockKind,
    pub value: String,
}

impl From<&ContentBlock> for BlockBody {
    fn from(block: &ContentBlock) -> Self {
        Self {
            kind: block.kind(),
            value: block.value().to_string(),
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct CreateLessonRequest {
    pub title: String,
    #[serde(default)]
    pub system_prompt: String,
    pub content: Vec<BlockBody>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct LessonResponse {
    pub id: u64,
    pub title: String,
    pub system_prompt: String,
    pub content: Vec<BlockBody>,
    pub created_at: DateTime<Utc>,
}

impl From<&Lesson> for LessonResponse {
    fn from(lesson: &Lesson) -> Self {
        Self {
            id: lesson.id().0,
            title: lesson.title().to_string(),
            system_prompt: lesson.system_prompt().to_string(),
            content: lesson.content().iter().map(BlockBody::from).collect(),
            created_at: lesson.created_at(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct LessonSummaryResponse {
    pub id: u64,
    pub title: String,
    pub block_count: usize,
    pub kinds: String,
}

impl From<LessonSummary> for LessonSummaryResponse {
    fn from(summary: LessonSummary) -> Self {
        Self {
            id: summary.id.0,
            title: summary.title,
            block_count: summary.block_count,
            kinds: summary.kinds,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct UploadResponse {
    /// The inline `data:` value to place in an image block.
    pub value: String,
}

//=========================================================================================
// Viewing
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct QuestionRequest {
    pub question: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct AnswerResponse {
    pub index: usize,
    /// The reply, or `Error: ...` when the question could not be answered.
    pub answer: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, PartialEq)]
pub struct BlockAnswer {
    pub index: usize,
    pub pending: bool,
    pub answer: Option<String>,
}

impl BlockAnswer {
    pub fn from_entry(index: usize, entry: QaEntry) -> Self {
        match entry {
            QaEntry::Pending => Self {
                index,
                pending: true,
                answer: None,
            },
            QaEntry::Answered(answer) => Self {
                index,
                pending: false,
                answer: Some(answer),
            },
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct ViewerResponse {
    pub lesson: LessonResponse,
    pub answers: Vec<BlockAnswer>,
}

impl ViewerResponse {
    pub fn new(lesson: &Lesson, entries: BTreeMap<usize, QaEntry>) -> Self {
        Self {
            lesson: LessonResponse::from(lesson),
            answers: entries
                .into_iter()
                .map(|(index, entry)| BlockAnswer::from_entry(index, entry))
                .collect(),
        }
    }
}
