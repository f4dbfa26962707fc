//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a new admin user (promotes the account if the phone exists)
//! nabta-cli admin create -p +249912345678 -w 'a-strong-password' -n "Admin Name"
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use thiserror::Error;

use nabta_core::{Phone, PhoneError};

/// Minimum password length, matching the API's registration rule.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid phone number.
    #[error("Invalid phone number: {0}")]
    InvalidPhone(#[from] PhoneError),

    /// Password too short.
    #[error("Password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,

    /// Password hashing failed.
    #[error("Password hashing failed")]
    PasswordHash,
}

/// Create an admin user, or promote and re-credential an existing account.
///
/// # Returns
///
/// The ID of the admin user.
///
/// # Errors
///
/// Returns `AdminError` if the phone or password is invalid, or a database
/// operation fails.
pub async fn create_user(
    phone: &str,
    password: &str,
    name: Option<&str>,
) -> Result<i64, AdminError> {
    dotenvy::dotenv().ok();

    let phone = Phone::parse(phone)?;

    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AdminError::WeakPassword);
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AdminError::PasswordHash)?
        .to_string();

    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| AdminError::MissingEnvVar("DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Creating admin user: {}", phone.as_str());

    let user_id: i64 = sqlx::query_scalar(
        r"
        INSERT INTO users (phone, password_hash, name, role)
        VALUES ($1, $2, $3, 'ADMIN')
        ON CONFLICT (phone) DO UPDATE
        SET password_hash = EXCLUDED.password_hash,
            name = COALESCE(EXCLUDED.name, users.name),
            role = 'ADMIN',
            is_active = TRUE,
            updated_at = now()
        RETURNING id
        ",
    )
    .bind(phone.as_str())
    .bind(&password_hash)
    .bind(name)
    .fetch_one(&pool)
    .await?;

    tracing::info!(
        "Admin user ready. ID: {}, Phone: {}",
        user_id,
        phone.as_str()
    );

    Ok(user_id)
}
