use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{Method, Request, StatusCode, Uri, header, request::Parts},
    response::IntoResponse,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use course_api::{
    AppState,
    auth::AuthUser,
    config::AppConfig,
    error::{ApiError, StoreError},
    models::{Course, CourseRequest, CourseWithOwner, NewUser, User},
    repository::Repository,
};
use std::sync::Arc;

// --- Mock Repository for Auth Logic ---

#[derive(Default)]
struct MockAuthRepo {
    user_to_return: Option<User>,
    fail_lookup: bool,
}

#[async_trait]
impl Repository for MockAuthRepo {
    async fn find_user_by_email(&self, _email: &str) -> Result<Option<User>, StoreError> {
        if self.fail_lookup {
            return Err(StoreError::Database("store unavailable".to_string()));
        }
        Ok(self.user_to_return.clone())
    }

    // The extractor only touches find_user_by_email; the rest are inert.
    async fn create_user(&self, _new: NewUser) -> Result<User, StoreError> {
        Ok(User::default())
    }
    async fn list_courses(&self) -> Result<Vec<CourseWithOwner>, StoreError> {
        Ok(vec![])
    }
    async fn get_course(&self, _id: i64) -> Result<Option<Course>, StoreError> {
        Ok(None)
    }
    async fn create_course(&self, _fields: CourseRequest) -> Result<Course, StoreError> {
        Ok(Course::default())
    }
    async fn update_course(&self, _id: i64, _fields: CourseRequest) -> Result<bool, StoreError> {
        Ok(false)
    }
    async fn delete_course(&self, _id: i64) -> Result<bool, StoreError> {
        Ok(false)
    }
}

// --- Helper Functions ---

const TEST_EMAIL: &str = "joe@smith.com";
const TEST_PASSWORD: &str = "joepassword";
// bcrypt's minimum cost; the crate keeps its MIN_COST constant private.
const MIN_COST: u32 = 4;

fn stored_user() -> User {
    User {
        id: 1,
        first_name: "Joe".to_string(),
        last_name: "Smith".to_string(),
        email_address: TEST_EMAIL.to_string(),
        // MIN_COST keeps the suite fast; verification ignores cost.
        password: bcrypt::hash(TEST_PASSWORD, MIN_COST).unwrap(),
        ..User::default()
    }
}

fn create_app_state(repo: MockAuthRepo) -> AppState {
    AppState {
        repo: Arc::new(repo),
        config: AppConfig::default(),
    }
}

fn get_request_parts(method: Method, uri: Uri) -> Parts {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

fn basic_header(name: &str, secret: &str) -> header::HeaderValue {
    let encoded = BASE64.encode(format!("{name}:{secret}"));
    header::HeaderValue::from_str(&format!("Basic {encoded}")).unwrap()
}

async fn extract(parts: &mut Parts, state: &AppState) -> Result<AuthUser, ApiError> {
    AuthUser::from_request_parts(parts, state).await
}

// --- Tests ---

#[tokio::test]
async fn auth_succeeds_with_valid_credentials() {
    let state = create_app_state(MockAuthRepo {
        user_to_return: Some(stored_user()),
        ..MockAuthRepo::default()
    });

    let mut parts = get_request_parts(Method::GET, "/api/users".parse().unwrap());
    parts
        .headers
        .insert(header::AUTHORIZATION, basic_header(TEST_EMAIL, TEST_PASSWORD));

    let auth_user = extract(&mut parts, &state).await;

    assert!(auth_user.is_ok());
    let AuthUser { user } = auth_user.unwrap();
    assert_eq!(user.email_address, TEST_EMAIL);
    assert_eq!(user.first_name, "Joe");
}

#[tokio::test]
async fn auth_fails_with_missing_header() {
    let state = create_app_state(MockAuthRepo::default());
    let mut parts = get_request_parts(Method::GET, "/api/users".parse().unwrap());

    let auth_user = extract(&mut parts, &state).await;

    assert!(matches!(auth_user, Err(ApiError::Unauthorized)));
}

#[tokio::test]
async fn auth_fails_with_non_basic_scheme() {
    let state = create_app_state(MockAuthRepo {
        user_to_return: Some(stored_user()),
        ..MockAuthRepo::default()
    });

    let mut parts = get_request_parts(Method::GET, "/api/users".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_static("Bearer some.jwt.token"),
    );

    let auth_user = extract(&mut parts, &state).await;

    assert!(matches!(auth_user, Err(ApiError::Unauthorized)));
}

#[tokio::test]
async fn auth_fails_with_undecodable_header() {
    let state = create_app_state(MockAuthRepo {
        user_to_return: Some(stored_user()),
        ..MockAuthRepo::default()
    });

    let mut parts = get_request_parts(Method::GET, "/api/users".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_static("Basic %%%not-base64%%%"),
    );

    let auth_user = extract(&mut parts, &state).await;

    assert!(matches!(auth_user, Err(ApiError::Unauthorized)));
}

#[tokio::test]
async fn auth_fails_for_unknown_user() {
    // Store holds no users at all.
    let state = create_app_state(MockAuthRepo::default());

    let mut parts = get_request_parts(Method::GET, "/api/users".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        basic_header("nobody@nowhere.com", "whatever"),
    );

    let auth_user = extract(&mut parts, &state).await;

    assert!(matches!(auth_user, Err(ApiError::Unauthorized)));
}

#[tokio::test]
async fn auth_fails_for_wrong_password() {
    let state = create_app_state(MockAuthRepo {
        user_to_return: Some(stored_user()),
        ..MockAuthRepo::default()
    });

    let mut parts = get_request_parts(Method::GET, "/api/users".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        basic_header(TEST_EMAIL, "not-the-password"),
    );

    let auth_user = extract(&mut parts, &state).await;

    assert!(matches!(auth_user, Err(ApiError::Unauthorized)));
}

#[tokio::test]
async fn auth_fails_generically_when_store_errors() {
    let state = create_app_state(MockAuthRepo {
        fail_lookup: true,
        ..MockAuthRepo::default()
    });

    let mut parts = get_request_parts(Method::GET, "/api/users".parse().unwrap());
    parts
        .headers
        .insert(header::AUTHORIZATION, basic_header(TEST_EMAIL, TEST_PASSWORD));

    let auth_user = extract(&mut parts, &state).await;

    assert!(matches!(auth_user, Err(ApiError::Unauthorized)));
}

#[tokio::test]
async fn every_rejection_has_the_same_response_shape() {
    // Missing header, unknown user, and wrong password must produce
    // byte-identical response bodies so a probe learns nothing.
    let state = create_app_state(MockAuthRepo {
        user_to_return: Some(stored_user()),
        ..MockAuthRepo::default()
    });

    let mut bodies = Vec::new();
    for authorization in [
        None,
        Some(basic_header("nobody@nowhere.com", "whatever")),
        Some(basic_header(TEST_EMAIL, "wrong")),
    ] {
        let mut parts = get_request_parts(Method::GET, "/api/users".parse().unwrap());
        if let Some(value) = authorization {
            parts.headers.insert(header::AUTHORIZATION, value);
        }

        let rejection = extract(&mut parts, &state).await.unwrap_err();
        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        bodies.push(bytes);
    }

    assert_eq!(
        serde_json::from_slice::<serde_json::Value>(&bodies[0]).unwrap(),
        serde_json::json!({ "message": "Access Denied" })
    );
    assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
}
