//! User domain models.
//!
//! The stored password hash never leaves the db layer's auth lookup; the
//! serialized [`User`] carries no credential material.

use serde::{Deserialize, Serialize};

use eshop_core::{Email, UserId};

/// A registered user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub phone: String,
    /// Admins may mutate the catalog and read other users' data.
    pub is_admin: bool,
    pub street: String,
    pub apartment: String,
    pub zip: String,
    pub city: String,
    pub country: String,
}

/// Input for registering a user.
///
/// Registration never grants the admin flag; admin users are created via
/// the CLI.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserInput {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub apartment: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
}

/// Input for logging in.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Response to a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// The email the token was issued for.
    pub user: String,
    /// Bearer token to present on authenticated routes.
    pub token: String,
}
