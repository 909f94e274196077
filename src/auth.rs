use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

use crate::{error::ApiError, models::User, password, repository::RepositoryState};

/// AuthUser
///
/// The resolved identity of an authenticated request: the full user record
/// looked up and verified by the extractor. Handlers receive it as a plain
/// argument, so the identity travels in request scope and never through
/// shared state.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
}

/// parse_basic_credentials
///
/// Decodes an `Authorization: Basic <base64(name:secret)>` header value into
/// its name/secret pair. Returns None for any other scheme, undecodable
/// base64, non-UTF-8 payloads, or a payload without a colon.
pub fn parse_basic_credentials(header_value: &str) -> Option<(String, String)> {
    let encoded = header_value.strip_prefix("Basic ")?;
    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (name, secret) = decoded.split_once(':')?;
    Some((name.to_string(), secret.to_string()))
}

// The rejection reason is diagnostics only. Callers always receive the same
// generic 401, so a probe cannot distinguish an unknown email from a wrong
// password.
fn reject(reason: &str) -> ApiError {
    tracing::warn!("authentication rejected: {reason}");
    ApiError::Unauthorized
}

/// AuthUser Extractor Implementation
///
/// Implements Axum's `FromRequestParts`, making `AuthUser` usable as an
/// argument in any authenticated handler. The flow has two terminal
/// outcomes: the identity is attached, or the request is rejected with 401.
///
/// 1. Parse the Authorization header as Basic credentials.
/// 2. Look up the user by email address through the repository.
/// 3. Verify the secret against the stored bcrypt hash.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let repo = RepositoryState::from_ref(state);

        let credentials = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_basic_credentials);

        let Some((name, secret)) = credentials else {
            return Err(reject("auth header not found or not parseable"));
        };

        let user = match repo.find_user_by_email(&name).await {
            Ok(Some(user)) => user,
            Ok(None) => return Err(reject(&format!("user not found for username: {name}"))),
            Err(err) => {
                // Store failures during auth still surface as a generic 401.
                tracing::error!("user lookup failed during authentication: {err}");
                return Err(ApiError::Unauthorized);
            }
        };

        if !password::verify_password(&secret, &user.password) {
            return Err(reject(&format!(
                "authentication failure for username: {name}"
            )));
        }

        Ok(AuthUser { user })
    }
}
