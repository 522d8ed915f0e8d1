//! Admin user management commands.
//!
//! Registration over HTTP never grants the admin flag, so the first (and
//! every) admin account is created here.

use secrecy::SecretString;
use sqlx::PgPool;

use eshop_api::db::users::{NewUser, UserRepository};
use eshop_api::db::{RepositoryError, create_pool};
use eshop_api::services::auth::{AuthError, hash_password, validate_password};
use eshop_core::{Email, EmailError};

/// Errors that can occur while creating an admin user.
#[derive(Debug, thiserror::Error)]
pub enum AdminCommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Create an admin user.
///
/// # Errors
///
/// Returns `AdminCommandError` if validation fails, the email is taken,
/// or the database is unreachable.
pub async fn create_user(email: &str, name: &str, password: &str) -> Result<(), AdminCommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("ESHOP_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| AdminCommandError::MissingEnvVar("ESHOP_DATABASE_URL"))?;

    let email = Email::parse(email)?;
    validate_password(password)?;
    let password_hash = hash_password(password)?;

    let pool: PgPool = create_pool(&SecretString::from(database_url)).await?;

    let new_user = NewUser {
        name: name.to_owned(),
        email,
        password_hash,
        phone: String::new(),
        is_admin: true,
        street: String::new(),
        apartment: String::new(),
        zip: String::new(),
        city: String::new(),
        country: String::new(),
    };

    let user = UserRepository::new(&pool).create(&new_user).await?;
    tracing::info!("Created admin user {} ({})", user.name, user.email);

    Ok(())
}
