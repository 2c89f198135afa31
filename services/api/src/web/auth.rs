//! services/api/src/web/auth.rs
//!
//! Login, logout and role switching for the single local session.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use lesson_assistant_core::SessionError;
use std::sync::Arc;
use tracing::error;

use crate::web::{
    protocol::{LoginRequest, SessionResponse},
    state::AppState,
};

/// The credential slot does file I/O under a lock; keep it off the async workers.
async fn blocking<F>(f: F) -> Result<(), String>
where
    F: FnOnce() -> Result<(), SessionError> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result.map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    }
}

fn session_response(state: &AppState) -> SessionResponse {
    let role = state.session.role();
    SessionResponse {
        logged_in: role.is_some(),
        role,
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/login - Store the API key and pick a role
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = SessionResponse),
        (status = 400, description = "The API key is empty"),
        (status = 500, description = "The credential could not be stored")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.api_key.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "An API key is required".to_string()));
    }

    let session = state.session.clone();
    blocking(move || session.login(req.role, &req.api_key))
        .await
        .map_err(|e| {
            error!("Failed to log in: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to store the API key".to_string())
        })?;

    // A new login starts from the dashboard, not from a lesson.
    state.close_viewer().await;

    Ok((StatusCode::OK, Json(session_response(&state))))
}

/// POST /auth/logout - Clear the API key and the role
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = SessionResponse),
        (status = 500, description = "The credential could not be removed")
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session = state.session.clone();
    blocking(move || session.logout()).await.map_err(|e| {
        error!("Failed to log out: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Failed to log out".to_string())
    })?;
    state.close_viewer().await;

    Ok((StatusCode::OK, Json(session_response(&state))))
}

/// GET /auth/session - Who is logged in
#[utoipa::path(
    get,
    path = "/auth/session",
    responses((status = 200, description = "Current session", body = SessionResponse))
)]
pub async fn session_handler(State(state): State<Arc<AppState>>) -> Json<SessionResponse> {
    Json(session_response(&state))
}

/// POST /auth/switch-role - Toggle between the admin and user dashboards
#[utoipa::path(
    post,
    path = "/auth/switch-role",
    responses(
        (status = 200, description = "Role switched", body = SessionResponse),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn switch_role_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .session
        .switch_role()
        .map_err(|e| (StatusCode::UNAUTHORIZED, e.to_string()))?;
    state.close_viewer().await;

    Ok((StatusCode::OK, Json(session_response(&state))))
}
