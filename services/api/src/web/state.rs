//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the currently open viewing session.

use crate::config::Config;
use lesson_assistant_core::{
    ChatCompletionService, Lesson, LessonStore, QuestionAnswerEngine, SessionContext,
    ViewingSession,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub session: Arc<SessionContext>,
    pub lessons: Arc<LessonStore>,
    pub qa_engine: Arc<QuestionAnswerEngine>,
    /// The lesson the user is looking at, with its per-block answers.
    pub viewer: Arc<RwLock<Option<Arc<ViewingSession>>>>,
}

impl AppState {
    /// Wires the engine to the session's credential store.
    pub fn new(
        config: Arc<Config>,
        session: Arc<SessionContext>,
        chat: Arc<dyn ChatCompletionService>,
    ) -> Self {
        let qa_engine = Arc::new(QuestionAnswerEngine::new(
            chat,
            session.credentials(),
            config.request_policy(),
        ));
        Self {
            config,
            session,
            lessons: Arc::new(LessonStore::new()),
            qa_engine,
            viewer: Arc::new(RwLock::new(None)),
        }
    }

    /// Opens `lesson` for viewing. Answers from the previous lesson are dropped.
    pub async fn open_viewer(&self, lesson: Lesson) -> Arc<ViewingSession> {
        info!(lesson = %lesson.id(), "Opening lesson for viewing.");
        let viewing = Arc::new(ViewingSession::new(self.qa_engine.clone(), lesson));
        *self.viewer.write().await = Some(viewing.clone());
        viewing
    }

    pub async fn current_viewer(&self) -> Option<Arc<ViewingSession>> {
        self.viewer.read().await.clone()
    }

    /// Teardown on logout.
    pub async fn close_viewer(&self) {
        *self.viewer.write().await = None;
    }
}
