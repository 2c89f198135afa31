//! services/api/src/web/middleware.rs
//!
//! The role gate in front of the authoring and viewing routes.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use lesson_assistant_core::Role;
use std::sync::Arc;
use tracing::warn;

use crate::web::state::AppState;

/// `401` when nobody is logged in, `403` when the role does not match.
fn check_role(state: &AppState, wanted: Option<Role>) -> Result<(), StatusCode> {
    let role = state.session.role().ok_or(StatusCode::UNAUTHORIZED)?;
    match wanted {
        Some(wanted) if wanted != role => {
            warn!(?role, ?wanted, "Route refused for the current role.");
            Err(StatusCode::FORBIDDEN)
        }
        _ => Ok(()),
    }
}

/// Any logged-in role.
pub async fn require_login(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    check_role(&state, None)?;
    Ok(next.run(req).await)
}

/// The authoring surface.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    check_role(&state, Some(Role::Admin))?;
    Ok(next.run(req).await)
}

/// The presentation surface.
pub async fn require_user(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    check_role(&state, Some(Role::User))?;
    Ok(next.run(req).await)
}
