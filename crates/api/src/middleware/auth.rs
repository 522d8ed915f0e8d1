//! Bearer-token extractors for route handlers.
//!
//! Provides extractors for requiring authentication in route handlers.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use eshop_core::UserId;

use crate::services::auth::{self, Claims};
use crate::state::AppState;

/// The authenticated caller, decoded from the bearer token.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub id: UserId,
    pub is_admin: bool,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.user_id(),
            is_admin: claims.is_admin,
        }
    }
}

/// Error returned when authentication is required but missing or invalid.
#[derive(Debug)]
pub enum AuthRejection {
    /// No usable `Authorization: Bearer` header on the request.
    MissingToken,
    /// The token did not verify (bad signature, malformed, expired).
    InvalidToken,
    /// Valid token, but the route needs the admin flag.
    Forbidden,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MissingToken | Self::InvalidToken => {
                (StatusCode::UNAUTHORIZED, "The user is not authorized")
            }
            Self::Forbidden => (StatusCode::FORBIDDEN, "Admin access required"),
        };

        (
            status,
            Json(json!({ "success": false, "message": message })),
        )
            .into_response()
    }
}

/// Pull the bearer token out of the Authorization header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn place_order(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("order for user {}", user.id)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthRejection::MissingToken)?;
        let claims =
            auth::verify_token(state.jwt(), token).map_err(|_| AuthRejection::InvalidToken)?;

        Ok(Self(claims.into()))
    }
}

/// Extractor that requires a valid bearer token with the admin flag.
///
/// Rejects with 401 for missing/invalid tokens and 403 for authenticated
/// non-admins.
pub struct RequireAdmin(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;

        if !user.is_admin {
            return Err(AuthRejection::Forbidden);
        }

        Ok(Self(user))
    }
}

/// Extractor that optionally decodes the current user.
///
/// Unlike `RequireAuth`, this does not reject the request when the token
/// is absent or invalid.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = bearer_token(parts)
            .and_then(|token| auth::verify_token(state.jwt(), token).ok())
            .map(CurrentUser::from);

        Ok(Self(user))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use axum::http::Request;
    use secrecy::SecretString;

    use crate::config::ApiConfig;
    use crate::services::auth::issue_token;

    use super::*;

    const TEST_SECRET: &str = "mK2nL5pQ7rT0uW4zC6aB3xY9dF1gH8jV";

    fn test_state() -> AppState {
        let config = ApiConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            api_prefix: "/api/v1".to_string(),
            base_url: "http://localhost:3000".to_string(),
            uploads_dir: PathBuf::from("public/uploads"),
            jwt_secret: SecretString::from(TEST_SECRET),
            token_ttl_hours: 24,
            sentry_dsn: None,
        };
        // connect_lazy performs no I/O; these tests never touch the pool.
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/test")
            .unwrap();

        AppState::new(config, pool)
    }

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/v1/orders");
        if let Some(v) = value {
            builder = builder.header(header::AUTHORIZATION, v);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_require_auth_accepts_valid_token() {
        let state = test_state();
        let token = issue_token(state.jwt(), UserId::new(42), false, 24).unwrap();
        let mut parts = parts_with_auth(Some(&format!("Bearer {token}")));

        let RequireAuth(user) = RequireAuth::from_request_parts(&mut parts, &state)
            .await
            .expect("valid token accepted");
        assert_eq!(user.id, UserId::new(42));
        assert!(!user.is_admin);
    }

    #[tokio::test]
    async fn test_require_auth_rejects_missing_header() {
        let state = test_state();
        let mut parts = parts_with_auth(None);

        let rejection = RequireAuth::from_request_parts(&mut parts, &state)
            .await
            .err()
            .expect("missing header rejected");
        assert_eq!(
            rejection.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_require_auth_rejects_garbage_token() {
        let state = test_state();
        let mut parts = parts_with_auth(Some("Bearer not.a.jwt"));

        let rejection = RequireAuth::from_request_parts(&mut parts, &state)
            .await
            .err()
            .expect("garbage token rejected");
        assert_eq!(
            rejection.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_require_admin_rejects_non_admin() {
        let state = test_state();
        let token = issue_token(state.jwt(), UserId::new(42), false, 24).unwrap();
        let mut parts = parts_with_auth(Some(&format!("Bearer {token}")));

        let rejection = RequireAdmin::from_request_parts(&mut parts, &state)
            .await
            .err()
            .expect("non-admin rejected");
        assert_eq!(rejection.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_require_admin_accepts_admin() {
        let state = test_state();
        let token = issue_token(state.jwt(), UserId::new(1), true, 24).unwrap();
        let mut parts = parts_with_auth(Some(&format!("Bearer {token}")));

        let RequireAdmin(user) = RequireAdmin::from_request_parts(&mut parts, &state)
            .await
            .expect("admin accepted");
        assert!(user.is_admin);
    }

    #[tokio::test]
    async fn test_optional_auth_tolerates_anonymous() {
        let state = test_state();
        let mut parts = parts_with_auth(None);

        let OptionalAuth(user) = OptionalAuth::from_request_parts(&mut parts, &state)
            .await
            .expect("infallible");
        assert!(user.is_none());
    }
}
