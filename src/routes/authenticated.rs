use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Authenticated Router Module
///
/// Every route here sits behind the basic-auth middleware layer applied in
/// `create_router`, and each handler additionally takes the `AuthUser`
/// extractor as an argument. Authentication is the only gate: once
/// authenticated, a user may mutate any course regardless of ownership.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /users
        // The currently authenticated user's public identity fields.
        .route("/users", get(handlers::get_current_user))
        // POST /courses
        // Creates a course with the fields from the body, including userId.
        .route("/courses", post(handlers::create_course))
        // PUT/DELETE /courses/{id}
        // Id-targeted mutation of an existing course. Unknown ids yield 404.
        .route(
            "/courses/{id}",
            put(handlers::update_course).delete(handlers::delete_course),
        )
}
