pub mod auth;
pub mod middleware;
pub mod protocol;
pub mod rest;
pub mod state;
pub mod viewer;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub use middleware::{require_admin, require_login, require_user};
pub use state::AppState;

/// Builds the API router: public session routes, then one gated group per role.
pub fn router(app_state: Arc<AppState>) -> Router {
    // Public routes (no session required)
    let public_routes = Router::new()
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .route("/auth/session", get(auth::session_handler));

    // Any logged-in role
    let session_routes = Router::new()
        .route("/auth/switch-role", post(auth::switch_role_handler))
        .route("/lessons", get(rest::list_lessons_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_login,
        ));

    // Authoring surface
    let admin_routes = Router::new()
        .route("/admin/lessons", post(rest::create_lesson_handler))
        .route("/admin/lessons/summaries", get(rest::list_summaries_handler))
        .route("/admin/uploads/image", post(rest::upload_image_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_admin,
        ));

    // Presentation surface
    let user_routes = Router::new()
        .route("/user/lessons/{id}/view", post(viewer::open_lesson_handler))
        .route("/user/viewer", get(viewer::get_viewer_handler))
        .route(
            "/user/viewer/blocks/{index}/questions",
            post(viewer::ask_question_handler),
        )
        .route(
            "/user/viewer/blocks/{index}/quick-actions/{action}",
            post(viewer::quick_action_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_user,
        ));

    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .merge(admin_routes)
        .merge(user_routes)
        .with_state(app_state)
}
