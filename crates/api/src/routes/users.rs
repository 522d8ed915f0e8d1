//! User route handlers: registration, login, and admin user management.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use eshop_core::{Email, UserId};

use crate::db::users::NewUser;
use crate::db::{RepositoryError, UserRepository};
use crate::error::{ApiError, Result};
use crate::middleware::auth::{RequireAdmin, RequireAuth};
use crate::models::user::{LoginInput, LoginResponse, RegisterUserInput, User};
use crate::services::auth::{
    self, AuthError, hash_password, validate_password, verify_password,
};
use crate::state::AppState;

/// Register a new account. Never grants the admin flag.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterUserInput>,
) -> Result<Json<User>> {
    if input.name.trim().is_empty() {
        return Err(ApiError::Validation("name must not be empty".to_owned()));
    }

    let email =
        Email::parse(&input.email).map_err(|e| AuthError::InvalidEmail(e.to_string()))?;
    validate_password(&input.password)?;
    let password_hash = hash_password(&input.password)?;

    let new_user = NewUser {
        name: input.name,
        email,
        password_hash,
        phone: input.phone,
        is_admin: false,
        street: input.street,
        apartment: input.apartment,
        zip: input.zip,
        city: input.city,
        country: input.country,
    };

    let user = UserRepository::new(state.pool())
        .create(&new_user)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => ApiError::Auth(AuthError::EmailTaken),
            other => other.into(),
        })?;

    Ok(Json(user))
}

/// Log in and receive a bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<LoginResponse>> {
    let email =
        Email::parse(&input.email).map_err(|e| AuthError::InvalidEmail(e.to_string()))?;

    let credentials = UserRepository::new(state.pool())
        .find_for_login(&email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    verify_password(&input.password, &credentials.password_hash)?;

    let token = auth::issue_token(
        state.jwt(),
        credentials.id,
        credentials.is_admin,
        state.config().token_ttl_hours,
    )?;

    Ok(Json(LoginResponse {
        user: credentials.email,
        token,
    }))
}

/// List all users.
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<User>>> {
    let users = UserRepository::new(state.pool()).list().await?;
    Ok(Json(users))
}

/// Get a user by id. Non-admins may only read themselves.
pub async fn get(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Path(id): Path<UserId>,
) -> Result<Json<User>> {
    if !caller.is_admin && id != caller.id {
        return Err(ApiError::Forbidden(
            "cannot read another user".to_owned(),
        ));
    }

    UserRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("user".to_owned()))
}

/// Delete a user.
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<UserId>,
) -> Result<Json<Value>> {
    UserRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => ApiError::NotFound("user".to_owned()),
            other => other.into(),
        })?;

    Ok(Json(json!({
        "success": true,
        "message": "the user was deleted"
    })))
}

/// Count all users.
pub async fn count(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Value>> {
    let count = UserRepository::new(state.pool()).count().await?;
    Ok(Json(json!({ "userCount": count })))
}
