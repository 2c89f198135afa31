//! crates/lesson_assistant_core/src/store.rs
//!
//! The in-memory, append-only lesson store.
//!
//! Lessons live for the lifetime of the process only; restarting it discards them.

use crate::domain::{Lesson, LessonDraft, LessonId, LessonSummary};
use std::sync::{PoisonError, RwLock};
use tracing::info;

#[derive(Default)]
struct Inner {
    lessons: Vec<Lesson>,
    next_id: u64,
}

#[derive(Default)]
pub struct LessonStore {
    inner: RwLock<Inner>,
}

impl LessonStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a fresh id and appends. Ids are never reused.
    pub fn add(&self, draft: LessonDraft) -> Lesson {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.next_id += 1;
        let lesson = Lesson::from_draft(LessonId(inner.next_id), draft);
        inner.lessons.push(lesson.clone());
        info!(id = %lesson.id(), title = lesson.title(), "Lesson added.");
        lesson
    }

    /// All lessons in insertion order, which is also ascending id order.
    pub fn list(&self) -> Vec<Lesson> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .lessons
            .clone()
    }

    pub fn get(&self, id: LessonId) -> Option<Lesson> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .lessons
            .iter()
            .find(|lesson| lesson.id() == id)
            .cloned()
    }

    pub fn summaries(&self) -> Vec<LessonSummary> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .lessons
            .iter()
            .map(Lesson::summary)
            .collect()
    }
}
