use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints that require no credentials: user registration and the two
/// read-only course views. Course reads intentionally expose every course;
/// there is no visibility flag in this data model.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Unauthenticated liveness endpoint for monitoring and load balancers.
        .route("/health", get(|| async { "ok" }))
        // POST /users
        // Registration. Validation and the duplicate-email check happen in
        // the handler before anything touches the store.
        .route("/users", post(handlers::create_user))
        // GET /courses
        // Lists every course joined with its owner's public fields.
        .route("/courses", get(handlers::list_courses))
        // GET /courses/{id}
        // Single course by primary key; an unknown id returns a JSON null
        // body with status 200.
        .route("/courses/{id}", get(handlers::get_course))
}
