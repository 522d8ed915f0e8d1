//! Password hashing and bearer-token service.
//!
//! Tokens are HS256 JWTs carrying the user id and admin flag; passwords
//! are hashed with Argon2id. Verification failures all collapse into
//! [`AuthError::InvalidCredentials`] / [`AuthError::InvalidToken`] so the
//! response never reveals which check failed.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use eshop_core::UserId;

use crate::state::JwtKeys;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors from the auth service.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email or password did not match.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Registration against an email that already has an account.
    #[error("an account with this email already exists")]
    EmailTaken,

    /// Password failed the strength check.
    #[error("{0}")]
    WeakPassword(String),

    /// Email failed validation.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// Hashing failed (unexpected).
    #[error("failed to hash password")]
    PasswordHash,

    /// Token signing failed (unexpected).
    #[error("failed to create token")]
    TokenCreation,

    /// Presented token is malformed, tampered with, or expired.
    #[error("invalid or expired token")]
    InvalidToken,
}

/// Claims carried by issued bearer tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// User id the token was issued for.
    pub sub: i32,
    /// Whether the user may mutate the catalog.
    pub is_admin: bool,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

impl Claims {
    /// The user the token was issued for.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        UserId::new(self.sub)
    }
}

/// Issue a signed bearer token for a user.
///
/// # Errors
///
/// Returns `AuthError::TokenCreation` if signing fails.
pub fn issue_token(
    keys: &JwtKeys,
    user_id: UserId,
    is_admin: bool,
    ttl_hours: i64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.as_i32(),
        is_admin,
        iat: now.timestamp(),
        exp: (now + Duration::hours(ttl_hours)).timestamp(),
    };

    encode(&Header::new(Algorithm::HS256), &claims, keys.encoding())
        .map_err(|_| AuthError::TokenCreation)
}

/// Verify a presented bearer token and return its claims.
///
/// # Errors
///
/// Returns `AuthError::InvalidToken` for anything that does not verify,
/// including expired tokens.
pub fn verify_token(keys: &JwtKeys, token: &str) -> Result<Claims, AuthError> {
    decode::<Claims>(token, keys.decoding(), &Validation::new(Algorithm::HS256))
        .map(|data| data.claims)
        .map_err(|_| AuthError::InvalidToken)
}

/// Validate password meets requirements.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` when the password is too short.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` if the password does not match.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_keys() -> JwtKeys {
        JwtKeys::new(b"mK2nL5pQ7rT0uW4zC6aB3xY9dF1gH8jV")
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("correct horse battery").expect("hash");
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_password_garbage_hash() {
        assert!(matches!(
            verify_password("whatever", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_validate_password_too_short() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("long enough").is_ok());
    }

    #[test]
    fn test_token_roundtrip() {
        let keys = test_keys();
        let token = issue_token(&keys, UserId::new(7), true, 24).expect("issue");

        let claims = verify_token(&keys, &token).expect("verify");
        assert_eq!(claims.user_id(), UserId::new(7));
        assert!(claims.is_admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_rejected_with_other_key() {
        let token = issue_token(&test_keys(), UserId::new(7), false, 24).expect("issue");

        let other = JwtKeys::new(b"aB3xY9dF1gH8jVmK2nL5pQ7rT0uW4zC6");
        assert!(matches!(
            verify_token(&other, &token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let keys = test_keys();
        // Negative TTL puts the expiry well past the default leeway.
        let token = issue_token(&keys, UserId::new(7), false, -2).expect("issue");

        assert!(matches!(
            verify_token(&keys, &token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_claims_wire_casing() {
        let claims = Claims {
            sub: 1,
            is_admin: true,
            iat: 0,
            exp: 1,
        };
        let json = serde_json::to_value(&claims).expect("serialize");
        assert!(json.get("isAdmin").is_some());
        assert!(json.get("is_admin").is_none());
    }
}
