use crate::{
    error::StoreError,
    models::{Course, CourseOwner, CourseRequest, CourseWithOwner, NewUser, User},
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{
    FromRow, SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::{str::FromStr, sync::Arc};

/// Repository Trait
///
/// The abstract contract for all persistence operations, letting handlers
/// talk to the data layer without knowing the concrete store. Atomicity of
/// each operation is delegated entirely to the implementation; the core
/// performs no transactions of its own.
///
/// **Send + Sync + async_trait** make `Arc<dyn Repository>` shareable across
/// Axum's asynchronous task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    /// Lookup by unique email address. Drives both authentication and the
    /// duplicate-email pre-check on registration.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    /// Inserts a new user. `new.password` must already be hashed.
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError>;

    // --- Courses ---
    /// Every course joined with its owner's public fields.
    async fn list_courses(&self) -> Result<Vec<CourseWithOwner>, StoreError>;
    async fn get_course(&self, id: i64) -> Result<Option<Course>, StoreError>;
    /// Inserts a course with the fields as provided; NOT NULL and FK
    /// enforcement on `user_id` happens at the store boundary.
    async fn create_course(&self, fields: CourseRequest) -> Result<Course, StoreError>;
    /// Applies the provided fields to an existing course. Returns false when
    /// no row matched the id.
    async fn update_course(&self, id: i64, fields: CourseRequest) -> Result<bool, StoreError>;
    /// Returns false when no row matched the id.
    async fn delete_course(&self, id: i64) -> Result<bool, StoreError>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the
/// application state.
pub type RepositoryState = Arc<dyn Repository>;

/// connect
///
/// Builds the SQLite pool for the given URL with foreign keys enforced.
/// The pool is capped at a single connection: the default store is
/// `sqlite::memory:`, where each new connection would otherwise see its own
/// empty database.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
}

/// init_schema
///
/// Creates the two tables if they do not exist. Full migration tooling is
/// out of scope; the schema is small enough to bootstrap in place.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email_address TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS courses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id),
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            estimated_time TEXT,
            materials_needed TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// SqliteRepository
///
/// The concrete implementation of `Repository`, backed by SQLite through
/// sqlx. The default configuration runs against an in-memory database, but
/// any SQLite URL works.
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Flat row for the course listing join; split into `CourseWithOwner` after
/// fetching because sqlx's runtime `query_as` cannot nest structs.
#[derive(FromRow)]
struct CourseOwnerRow {
    id: i64,
    user_id: i64,
    title: String,
    description: String,
    estimated_time: Option<String>,
    materials_needed: Option<String>,
    owner_first_name: String,
    owner_last_name: String,
    owner_email_address: String,
}

impl From<CourseOwnerRow> for CourseWithOwner {
    fn from(row: CourseOwnerRow) -> Self {
        CourseWithOwner {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            estimated_time: row.estimated_time,
            materials_needed: row.materials_needed,
            user: CourseOwner {
                id: row.user_id,
                first_name: row.owner_first_name,
                last_name: row.owner_last_name,
                email_address: row.owner_email_address,
            },
        }
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, email_address, password, created_at, updated_at
            FROM users
            WHERE email_address = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let now = Utc::now();
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (first_name, last_name, email_address, password, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING id, first_name, last_name, email_address, password, created_at, updated_at
            "#,
        )
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.email_address)
        .bind(&new.password)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list_courses(&self) -> Result<Vec<CourseWithOwner>, StoreError> {
        let rows = sqlx::query_as::<_, CourseOwnerRow>(
            r#"
            SELECT
                c.id, c.user_id, c.title, c.description,
                c.estimated_time, c.materials_needed,
                u.first_name AS owner_first_name,
                u.last_name AS owner_last_name,
                u.email_address AS owner_email_address
            FROM courses c
            JOIN users u ON c.user_id = u.id
            ORDER BY c.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CourseWithOwner::from).collect())
    }

    async fn get_course(&self, id: i64) -> Result<Option<Course>, StoreError> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, user_id, title, description, estimated_time, materials_needed,
                   created_at, updated_at
            FROM courses
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(course)
    }

    async fn create_course(&self, fields: CourseRequest) -> Result<Course, StoreError> {
        let now = Utc::now();
        // user_id binds as NULL when absent, so the store's NOT NULL
        // constraint raises the failure the handlers re-map to 400.
        let course = sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (user_id, title, description, estimated_time, materials_needed,
                                 created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING id, user_id, title, description, estimated_time, materials_needed,
                      created_at, updated_at
            "#,
        )
        .bind(fields.user_id)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.estimated_time)
        .bind(&fields.materials_needed)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(course)
    }

    async fn update_course(&self, id: i64, fields: CourseRequest) -> Result<bool, StoreError> {
        // COALESCE keeps columns for fields the caller did not provide.
        let result = sqlx::query(
            r#"
            UPDATE courses
            SET user_id = COALESCE(?2, user_id),
                title = COALESCE(?3, title),
                description = COALESCE(?4, description),
                estimated_time = COALESCE(?5, estimated_time),
                materials_needed = COALESCE(?6, materials_needed),
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(fields.user_id)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.estimated_time)
        .bind(&fields.materials_needed)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_course(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
