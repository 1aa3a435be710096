//! Router assembly.
//!
//! Builds the full application router from the shared states so the binary
//! and the integration tests serve exactly the same app.

use crate::auth::{api as auth_api, auth_middleware, AuthState};
use crate::middleware::request_logging;
use crate::students::{api as students_api, StudentState};
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;

/// Build the application router.
pub fn build_router(auth_state: AuthState, student_state: StudentState) -> Router {
    // Public auth routes (no token required)
    let public_auth = Router::new()
        .route("/api/register", post(auth_api::register))
        .route("/api/login", post(auth_api::login))
        .with_state(auth_state.clone());

    // Protected auth routes
    let protected_auth = Router::new()
        .route("/api/me", get(auth_api::me))
        .route("/api/profile", put(auth_api::update_profile))
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(auth_state.clone());

    // Protected student routes
    let students = Router::new()
        .route(
            "/api/students",
            get(students_api::list_students).post(students_api::create_student),
        )
        .route(
            "/api/students/:id",
            get(students_api::get_student)
                .put(students_api::update_student)
                .delete(students_api::delete_student),
        )
        .route_layer(middleware::from_fn_with_state(auth_state, auth_middleware))
        .with_state(student_state);

    let public = Router::new().route("/health", get(health_check));

    Router::new()
        .merge(public)
        .merge(public_auth)
        .merge(protected_auth)
        .merge(students)
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
}

async fn health_check() -> &'static str {
    "OK"
}
