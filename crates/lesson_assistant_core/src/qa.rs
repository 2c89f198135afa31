//! crates/lesson_assistant_core/src/qa.rs
//!
//! The question/answer engine. Turns a (block, question) pair into a chat
//! request, dispatches it, and folds every outcome into one answer string.
//!
//! Failures never leave this module as errors: they come back as `Error: <message>`.
//! Submissions on the same block are not serialized; whichever settles last
//! is what the block shows.

use crate::chat::{QuickAction, RequestPolicy};
use crate::credentials::CredentialStore;
use crate::domain::{Lesson, QaEntry};
use crate::ports::{ChatCompletionService, PortError};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QaError {
    #[error("API key is missing. Please make sure you have entered a valid OpenAI API key.")]
    MissingCredential,
    #[error("Content block {0} does not exist in this lesson")]
    NoSuchBlock(usize),
    #[error(transparent)]
    Port(#[from] PortError),
}

//=========================================================================================
// The Engine
//=========================================================================================

pub struct QuestionAnswerEngine {
    chat: Arc<dyn ChatCompletionService>,
    credentials: Arc<CredentialStore>,
    policy: RequestPolicy,
}

impl QuestionAnswerEngine {
    pub fn new(
        chat: Arc<dyn ChatCompletionService>,
        credentials: Arc<CredentialStore>,
        policy: RequestPolicy,
    ) -> Self {
        Self {
            chat,
            credentials,
            policy,
        }
    }

    /// Asks one question about `lesson.content[index]`.
    ///
    /// Checks the block and the credential before anything goes over the network.
    pub async fn ask(&self, lesson: &Lesson, index: usize, question: &str) -> Result<String, QaError> {
        let block = lesson.block(index).ok_or(QaError::NoSuchBlock(index))?;
        let credential = self.credentials.get().ok_or(QaError::MissingCredential)?;

        let request = self
            .policy
            .build_request(lesson.system_prompt(), block, question);

        info!(
            lesson = %lesson.id(),
            index,
            kind = %block.kind(),
            "Submitting question to the chat service."
        );
        let answer = self.chat.complete(&credential, &request).await?;
        Ok(answer)
    }

    /// Like [`ask`](Self::ask), but failures become `Error: <message>`.
    pub async fn answer(&self, lesson: &Lesson, index: usize, question: &str) -> String {
        match self.ask(lesson, index, question).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(lesson = %lesson.id(), index, "Question failed: {}", e);
                format!("Error: {}", e)
            }
        }
    }
}

//=========================================================================================
// Viewing Session
//=========================================================================================

/// The per-block answers of one lesson while it is being viewed.
///
/// Dropping the session (or opening another lesson) discards every entry.
pub struct ViewingSession {
    engine: Arc<QuestionAnswerEngine>,
    lesson: Lesson,
    entries: Mutex<HashMap<usize, QaEntry>>,
}

impl ViewingSession {
    pub fn new(engine: Arc<QuestionAnswerEngine>, lesson: Lesson) -> Self {
        Self {
            engine,
            lesson,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    /// Marks the block pending, waits for the engine, then records the answer.
    pub async fn submit(&self, index: usize, question: &str) -> String {
        self.record(index, QaEntry::Pending);
        let answer = self.engine.answer(&self.lesson, index, question).await;
        self.record(index, QaEntry::Answered(answer.clone()));
        answer
    }

    pub async fn quick_action(&self, index: usize, action: QuickAction) -> String {
        self.submit(index, action.question()).await
    }

    pub fn entry(&self, index: usize) -> Option<QaEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&index)
            .cloned()
    }

    /// Snapshot of every block that has been asked about, ordered by index.
    pub fn entries(&self) -> BTreeMap<usize, QaEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(index, entry)| (*index, entry.clone()))
            .collect()
    }

    fn record(&self, index: usize, entry: QaEntry) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(index, entry);
    }
}
