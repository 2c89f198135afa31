//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the lesson endpoints and the master
//! definition for the OpenAPI document.

use crate::web::{
    auth, viewer,
    protocol::{
        AnswerResponse, BlockAnswer, BlockBody, CreateLessonRequest, LessonResponse,
        LessonSummaryResponse, LoginRequest, QuestionRequest, SessionResponse, UploadResponse,
        ViewerResponse,
    },
    state::AppState,
};
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use lesson_assistant_core::{draft::inline_image_data, DraftBuilder};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login_handler,
        auth::logout_handler,
        auth::session_handler,
        auth::switch_role_handler,
        list_lessons_handler,
        list_summaries_handler,
        create_lesson_handler,
        upload_image_handler,
        viewer::open_lesson_handler,
        viewer::get_viewer_handler,
        viewer::ask_question_handler,
        viewer::quick_action_handler,
    ),
    components(
        schemas(
            LoginRequest, SessionResponse, BlockBody, CreateLessonRequest, LessonResponse,
            LessonSummaryResponse, UploadResponse, QuestionRequest, AnswerResponse,
            BlockAnswer, ViewerResponse
        )
    ),
    tags(
        (name = "Lesson Assistant API", description = "Authoring and viewing of multi-media lessons with per-block questions.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List every lesson in creation order.
#[utoipa::path(
    get,
    path = "/lessons",
    responses(
        (status = 200, description = "All lessons", body = Vec<LessonResponse>),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn list_lessons_handler(State(app_state): State<Arc<AppState>>) -> Json<Vec<LessonResponse>> {
    Json(
        app_state
            .lessons
            .list()
            .iter()
            .map(LessonResponse::from)
            .collect(),
    )
}

/// One line per lesson: title, block count and block kinds.
#[utoipa::path(
    get,
    path = "/admin/lessons/summaries",
    responses(
        (status = 200, description = "Lesson summaries", body = Vec<LessonSummaryResponse>),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn list_summaries_handler(
    State(app_state): State<Arc<AppState>>,
) -> Json<Vec<LessonSummaryResponse>> {
    Json(
        app_state
            .lessons
            .summaries()
            .into_iter()
            .map(LessonSummaryResponse::from)
            .collect(),
    )
}

/// Create a lesson from the editor's title, system prompt and blocks.
///
/// The id is assigned by the server.
#[utoipa::path(
    post,
    path = "/admin/lessons",
    request_body = CreateLessonRequest,
    responses(
        (status = 201, description = "Lesson created", body = LessonResponse),
        (status = 403, description = "Not an admin"),
        (status = 422, description = "A block is empty or malformed")
    )
)]
pub async fn create_lesson_handler(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<CreateLessonRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut builder = DraftBuilder::new();
    builder.set_title(req.title).set_system_prompt(req.system_prompt);
    for block in req.content {
        let index = builder.add_block(block.kind);
        builder
            .update_block(index, block.value)
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    }

    let draft = builder
        .build()
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    let lesson = app_state.lessons.add(draft);

    Ok((StatusCode::CREATED, Json(LessonResponse::from(&lesson))))
}

/// Turn an uploaded image into an inline value for an image block.
///
/// Accepts a multipart/form-data request with a single file part.
#[utoipa::path(
    post,
    path = "/admin/uploads/image",
    request_body(content_type = "multipart/form-data", description = "The image to inline."),
    responses(
        (status = 200, description = "Inline image value", body = UploadResponse),
        (status = 400, description = "Missing file or not an image"),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn upload_image_handler(
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| {
            error!("Failed to read multipart data: {}", e);
            (
                StatusCode::BAD_REQUEST,
                format!("Failed to read multipart data: {}", e),
            )
        })?
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                "Multipart form must include a file".to_string(),
            )
        })?;

    let mime = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let data = field.bytes().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Failed to read file bytes: {}", e),
        )
    })?;

    let value =
        inline_image_data(&mime, &data).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    info!(mime = %mime, bytes = data.len(), "Image inlined.");

    Ok(Json(UploadResponse { value }))
}
