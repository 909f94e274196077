use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// StoreError
///
/// Failure classes raised at the repository boundary. Constraint violations
/// (unique email, course foreign key, NOT NULL columns) are separated from
/// everything else because the handlers re-map them to 400 while all other
/// store failures bubble up as 500s.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Constraint(String),

    #[error("{0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => {
                use sqlx::error::ErrorKind;
                match db_err.kind() {
                    ErrorKind::UniqueViolation
                    | ErrorKind::ForeignKeyViolation
                    | ErrorKind::NotNullViolation
                    | ErrorKind::CheckViolation => {
                        StoreError::Constraint(db_err.message().to_string())
                    }
                    _ => StoreError::Database(err.to_string()),
                }
            }
            _ => StoreError::Database(err.to_string()),
        }
    }
}

/// ApiError
///
/// The full error taxonomy of the HTTP surface. Every handler returns
/// `Result<_, ApiError>`; `into_response` is the single place response shapes
/// are produced, so status codes and bodies cannot drift between handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Any authentication failure. The internal reason is logged by the
    /// extractor; the caller always sees the same generic message.
    #[error("Access Denied")]
    Unauthorized,

    /// One or more field-rule violations, in rule declaration order.
    #[error("validation failed")]
    Validation(Vec<String>),

    /// Duplicate email detected before the write.
    #[error("Sorry, that email address is already in use")]
    EmailInUse,

    /// The store rejected a write (unique/FK/NOT NULL). Carries the store's
    /// own message, surfaced under the validation-error key.
    #[error("{0}")]
    StoreConstraint(String),

    /// Update/delete targeted a course id that does not exist.
    #[error("Course Not Found")]
    CourseNotFound,

    /// Anything unexpected. Mapped to a 500 with an empty error detail object.
    #[error("{0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Constraint(msg) => ApiError::StoreConstraint(msg),
            StoreError::Database(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Access Denied" })),
            )
                .into_response(),
            ApiError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            ApiError::EmailInUse => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "Error": "Sorry, that email address is already in use" })),
            )
                .into_response(),
            ApiError::StoreConstraint(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "Validation Error": message })),
            )
                .into_response(),
            ApiError::CourseNotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": "Course Not Found" })),
            )
                .into_response(),
            ApiError::Internal(message) => {
                tracing::error!("unhandled error: {message}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": message, "error": {} })),
                )
                    .into_response()
            }
        }
    }
}
