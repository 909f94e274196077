use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// Canonical identity record stored in the `users` table. The `password`
/// column holds a bcrypt hash, never the plaintext, and is excluded from
/// every serialized form of this struct.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    // Unique across all users; doubles as the basic-auth username.
    pub email_address: String,
    /// Bcrypt hash of the registration password.
    #[serde(skip_serializing, default)]
    pub password: String,
    #[serde(skip_serializing, default)]
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing, default)]
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Course
///
/// A course record from the `courses` table. `user_id` references the owning
/// user and is enforced as NOT NULL with a foreign key at the store boundary.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Course {
    pub id: i64,
    // FK to users.id (owner context, not bound to the authenticated identity).
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub estimated_time: Option<String>,
    pub materials_needed: Option<String>,
    #[serde(skip_serializing, default)]
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing, default)]
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

// --- Request Payloads (Input Schemas) ---

/// CreateUserRequest
///
/// Input payload for registration (POST /api/users). Only deserialized after
/// the declarative rule list has passed, so all fields are required here.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    /// Plaintext as submitted; hashed before it ever reaches the store.
    pub password: String,
}

/// CourseRequest
///
/// Input payload for course creation and update. Every field is optional at
/// the deserialization layer: title/description presence is checked by the
/// handlers (collect-all-errors contract) and `user_id` is left to the
/// store's NOT NULL + foreign key constraints.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CourseRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub materials_needed: Option<String>,
}

/// NewUser
///
/// Internal insert payload handed to the repository. The `password` field is
/// already hashed by the time this struct exists.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub password: String,
}

// --- Response Projections (Output Schemas) ---

/// UserResponse
///
/// Output schema for GET /api/users: exactly the three public identity
/// fields. The password hash has no representation here by construction.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserResponse {
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        UserResponse {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email_address: user.email_address.clone(),
        }
    }
}

/// CourseResponse
///
/// Course projection for the read endpoints: the six contract fields, no
/// timestamps.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CourseResponse {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub estimated_time: Option<String>,
    pub materials_needed: Option<String>,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        CourseResponse {
            id: course.id,
            user_id: course.user_id,
            title: course.title,
            description: course.description,
            estimated_time: course.estimated_time,
            materials_needed: course.materials_needed,
        }
    }
}

/// CourseOwner
///
/// The owning user's public fields, nested inside each listed course.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CourseOwner {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
}

/// CourseWithOwner
///
/// A course joined with its owner, as returned by GET /api/courses.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CourseWithOwner {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub estimated_time: Option<String>,
    pub materials_needed: Option<String>,
    pub user: CourseOwner,
}

/// CoursesResponse
///
/// Envelope for the course listing: `{"courses": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CoursesResponse {
    pub courses: Vec<CourseWithOwner>,
}
