use crate::{
    AppState,
    auth::AuthUser,
    error::ApiError,
    models::{
        CourseRequest, CourseResponse, CoursesResponse, CreateUserRequest, NewUser, UserResponse,
    },
    password,
    validation::{self, user_rules},
};
use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

// --- User Handlers ---

/// get_current_user
///
/// [Authenticated Route] Returns the public identity fields of the caller
/// resolved by the `AuthUser` extractor. The password hash never appears in
/// the projection.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Currently authenticated user", body = UserResponse),
        (status = 401, description = "Access Denied")
    )
)]
pub async fn get_current_user(AuthUser { user }: AuthUser) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}

/// create_user
///
/// [Public Route] Registration. The declarative rule list runs first and
/// collects every violation; only a clean payload reaches the duplicate-email
/// check and the store. The duplicate-email failure keeps its own response
/// shape, distinct from the rule-violation list.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created, Location: /"),
        (status = 400, description = "Validation errors or duplicate email")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, ApiError> {
    let errors = validation::validate(&user_rules(), &body);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    // The rules guarantee the required fields are present non-empty strings,
    // so deserialization failure here is a programming error, not bad input.
    let request: CreateUserRequest =
        serde_json::from_value(body).map_err(|err| ApiError::Internal(err.to_string()))?;

    if state
        .repo
        .find_user_by_email(&request.email_address)
        .await?
        .is_some()
    {
        return Err(ApiError::EmailInUse);
    }

    let hashed = password::hash_password(&request.password)
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    state
        .repo
        .create_user(NewUser {
            first_name: request.first_name,
            last_name: request.last_name,
            email_address: request.email_address,
            password: hashed,
        })
        .await?;

    Ok((StatusCode::CREATED, [(header::LOCATION, "/")]))
}

// --- Course Handlers ---

/// list_courses
///
/// [Public Route] Every course joined with its owner's public fields, under
/// a `courses` envelope.
#[utoipa::path(
    get,
    path = "/api/courses",
    responses((status = 200, description = "All courses with owners", body = CoursesResponse))
)]
pub async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<CoursesResponse>, ApiError> {
    let courses = state.repo.list_courses().await?;
    Ok(Json(CoursesResponse { courses }))
}

/// get_course
///
/// [Public Route] Single course lookup by primary key. An unknown id yields
/// a 200 with a JSON `null` body rather than a 404; that is the published
/// contract for this endpoint.
#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    params(("id" = String, Path, description = "Course ID")),
    responses((status = 200, description = "The course, or null when absent", body = Option<CourseResponse>))
)]
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<CourseResponse>>, ApiError> {
    // A non-numeric id cannot match any row, so it takes the same null
    // path as an unknown numeric id.
    let Ok(id) = id.parse::<i64>() else {
        return Ok(Json(None));
    };
    let course = state.repo.get_course(id).await?;
    Ok(Json(course.map(CourseResponse::from)))
}

// Presence checks for the course write endpoints. Same collect-all-errors
// contract as the declarative registration rules.
fn course_presence_errors(request: &CourseRequest) -> Vec<String> {
    let mut errors = Vec::new();
    if !request.title.as_deref().is_some_and(|t| !t.trim().is_empty()) {
        errors.push("Please provide a title for the course".to_string());
    }
    if !request
        .description
        .as_deref()
        .is_some_and(|d| !d.trim().is_empty())
    {
        errors.push("Please provide a description for the course".to_string());
    }
    errors
}

/// create_course
///
/// [Authenticated Route] Persists a course with the fields as provided.
/// `userId` comes from the body and is not bound to the authenticated
/// identity; a missing or dangling `userId` fails at the store boundary and
/// surfaces as a 400 with the store's message.
#[utoipa::path(
    post,
    path = "/api/courses",
    request_body = CourseRequest,
    responses(
        (status = 201, description = "Course created, Location: api/courses/{id}"),
        (status = 400, description = "Missing title/description or store constraint"),
        (status = 401, description = "Access Denied")
    )
)]
pub async fn create_course(
    _auth: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<CourseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let errors = course_presence_errors(&request);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let course = state.repo.create_course(request).await?;

    // Location deliberately carries no leading slash; clients resolve it
    // against the request URL.
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("api/courses/{}", course.id))],
    ))
}

/// update_course
///
/// [Authenticated Route] Applies the incoming fields to an existing course.
/// Any authenticated user may update any course; there is no ownership check
/// beyond authentication.
#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    params(("id" = String, Path, description = "Course ID")),
    request_body = CourseRequest,
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Missing title/description or store constraint"),
        (status = 401, description = "Access Denied"),
        (status = 404, description = "Course Not Found")
    )
)]
pub async fn update_course(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<CourseRequest>,
) -> Result<StatusCode, ApiError> {
    let errors = course_presence_errors(&request);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    // Non-numeric ids match no course.
    let id: i64 = id.parse().map_err(|_| ApiError::CourseNotFound)?;

    if !state.repo.update_course(id, request).await? {
        return Err(ApiError::CourseNotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}

/// delete_course
///
/// [Authenticated Route] Deletes a course by id. Same policy as update: any
/// authenticated user, no ownership check.
#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    params(("id" = String, Path, description = "Course ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Access Denied"),
        (status = 404, description = "Course Not Found")
    )
)]
pub async fn delete_course(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    // Non-numeric ids match no course.
    let id: i64 = id.parse().map_err(|_| ApiError::CourseNotFound)?;

    if !state.repo.delete_course(id).await? {
        return Err(ApiError::CourseNotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}
