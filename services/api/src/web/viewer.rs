//! services/api/src/web/viewer.rs
//!
//! The presentation side: open a lesson, then ask questions about its blocks.
//! Engine failures arrive as `Error: ...` answers with a `200`, never as HTTP errors.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use lesson_assistant_core::{LessonId, QuickAction, ViewingSession};
use std::sync::Arc;
use tracing::{error, info};

use crate::web::{
    protocol::{AnswerResponse, QuestionRequest, ViewerResponse},
    state::AppState,
};

async fn open_viewer(state: &AppState) -> Result<Arc<ViewingSession>, (StatusCode, String)> {
    state
        .current_viewer()
        .await
        .ok_or_else(|| (StatusCode::NOT_FOUND, "No lesson is open".to_string()))
}

/// Runs the submission on its own task so the answer is recorded even if the
/// client goes away before it settles.
async fn submit_detached(
    viewing: Arc<ViewingSession>,
    index: usize,
    question: String,
) -> Result<String, (StatusCode, String)> {
    tokio::spawn(async move { viewing.submit(index, &question).await })
        .await
        .map_err(|e| {
            error!("Question task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "The question could not be processed".to_string(),
            )
        })
}

/// Select a lesson for viewing. Previous answers are discarded.
#[utoipa::path(
    post,
    path = "/user/lessons/{id}/view",
    params(("id" = u64, Path, description = "The lesson to open.")),
    responses(
        (status = 200, description = "Lesson opened", body = ViewerResponse),
        (status = 403, description = "Not in the user role"),
        (status = 404, description = "No such lesson")
    )
)]
pub async fn open_lesson_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<ViewerResponse>, (StatusCode, String)> {
    let lesson = state
        .lessons
        .get(LessonId(id))
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Lesson {} not found", id)))?;

    let viewing = state.open_viewer(lesson).await;
    Ok(Json(ViewerResponse::new(viewing.lesson(), viewing.entries())))
}

/// The open lesson and every block's question state.
#[utoipa::path(
    get,
    path = "/user/viewer",
    responses(
        (status = 200, description = "The open lesson", body = ViewerResponse),
        (status = 404, description = "No lesson is open")
    )
)]
pub async fn get_viewer_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ViewerResponse>, (StatusCode, String)> {
    let viewing = open_viewer(&state).await?;
    Ok(Json(ViewerResponse::new(viewing.lesson(), viewing.entries())))
}

/// Ask a free-form question about one block.
#[utoipa::path(
    post,
    path = "/user/viewer/blocks/{index}/questions",
    params(("index" = usize, Path, description = "Position of the block in the lesson.")),
    request_body = QuestionRequest,
    responses(
        (status = 200, description = "The answer, or an `Error: ...` line", body = AnswerResponse),
        (status = 400, description = "Empty question"),
        (status = 404, description = "No lesson is open")
    )
)]
pub async fn ask_question_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
    Json(req): Json<QuestionRequest>,
) -> Result<Json<AnswerResponse>, (StatusCode, String)> {
    if req.question.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "The question is empty".to_string()));
    }
    let viewing = open_viewer(&state).await?;

    info!(index, "Question received.");
    let answer = submit_detached(viewing, index, req.question).await?;
    Ok(Json(AnswerResponse { index, answer }))
}

/// Ask one of the canned questions about one block.
///
/// Unknown action codes fall back to "Can you explain this further?".
#[utoipa::path(
    post,
    path = "/user/viewer/blocks/{index}/quick-actions/{action}",
    params(
        ("index" = usize, Path, description = "Position of the block in the lesson."),
        ("action" = String, Path, description = "translate, explain, sources, exercise or challenge.")
    ),
    responses(
        (status = 200, description = "The answer, or an `Error: ...` line", body = AnswerResponse),
        (status = 404, description = "No lesson is open")
    )
)]
pub async fn quick_action_handler(
    State(state): State<Arc<AppState>>,
    Path((index, action)): Path<(usize, String)>,
) -> Result<Json<AnswerResponse>, (StatusCode, String)> {
    let viewing = open_viewer(&state).await?;

    let action = QuickAction::from_code(&action);
    info!(index, ?action, "Quick action received.");
    let answer = submit_detached(viewing, index, action.question().to_string()).await?;
    Ok(Json(AnswerResponse { index, answer }))
}
