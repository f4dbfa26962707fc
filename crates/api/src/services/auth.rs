//! Authentication service.
//!
//! Phone + password registration and login, argon2 password hashing, and
//! stateless bearer tokens (JWT, 7-day expiry, `sub` = user id).

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;

use nabta_core::{Phone, PhoneError, UserId};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Token lifetime.
const TOKEN_TTL_DAYS: i64 = 7;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Phone/password combination is wrong.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Phone number is already registered.
    #[error("phone number already registered")]
    PhoneTaken,

    /// Phone number failed validation.
    #[error("invalid phone number: {0}")]
    InvalidPhone(#[from] PhoneError),

    /// Password doesn't meet requirements.
    #[error("{0}")]
    WeakPassword(String),

    /// Bearer token is missing, malformed, or expired.
    #[error("invalid or expired token")]
    InvalidToken,

    /// The account has been deactivated.
    #[error("account is disabled")]
    AccountDisabled,

    /// Password hashing failed.
    #[error("password hashing failed")]
    PasswordHash,

    /// Database operation failed.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// JWT claims carried by a bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: i64,
    /// Issued-at (unix seconds).
    pub iat: i64,
    /// Expiry (unix seconds).
    pub exp: i64,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user with phone and password.
    ///
    /// The phone number is normalised to `+249…` before storage.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidPhone` if the phone format is invalid.
    /// Returns `AuthError::WeakPassword` if the password is too short.
    /// Returns `AuthError::PhoneTaken` if the phone is already registered.
    pub async fn register(
        &self,
        phone: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<User, AuthError> {
        let phone = Phone::parse(phone)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(&phone, &password_hash, name)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::PhoneTaken,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with phone and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the phone/password is wrong.
    /// Returns `AuthError::AccountDisabled` if the account is deactivated.
    pub async fn login(&self, phone: &str, password: &str) -> Result<User, AuthError> {
        let phone = Phone::parse(phone)?;

        let (user, password_hash) = self
            .users
            .get_auth_by_phone(&phone)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        if !user.is_active {
            return Err(AuthError::AccountDisabled);
        }

        Ok(user)
    }
}

/// Issue a bearer token for a user.
///
/// # Errors
///
/// Returns `AuthError::InvalidToken` if encoding fails (malformed secret).
pub fn issue_token(user_id: UserId, secret: &SecretString) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.into(),
        iat: now.timestamp(),
        exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )
    .map_err(|_| AuthError::InvalidToken)
}

/// Decode and validate a bearer token, returning the user id it names.
///
/// # Errors
///
/// Returns `AuthError::InvalidToken` if the token is malformed, has a bad
/// signature, or has expired.
pub fn decode_token(token: &str, secret: &SecretString) -> Result<UserId, AuthError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AuthError::InvalidToken)?;

    Ok(UserId::from(data.claims.sub))
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
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
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("hibiscus-and-clay").unwrap();
        assert!(verify_password("hibiscus-and-clay", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong-password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_password_too_short() {
        assert!(matches!(
            validate_password("abc"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("abcdef").is_ok());
    }

    #[test]
    fn test_token_roundtrip() {
        let secret = SecretString::from("k9#mP2$vL8@qR4!wN6^xT1&zB3*cF7%j");
        let token = issue_token(UserId::from(42), &secret).unwrap();
        let user_id = decode_token(&token, &secret).unwrap();
        assert_eq!(user_id, UserId::from(42));
    }

    #[test]
    fn test_token_wrong_secret_rejected() {
        let secret = SecretString::from("k9#mP2$vL8@qR4!wN6^xT1&zB3*cF7%j");
        let other = SecretString::from("j7%fC*3Bz&1Tx^6Nw!4Rq@8Lv$2Pm#9k");
        let token = issue_token(UserId::from(42), &secret).unwrap();
        assert!(matches!(
            decode_token(&token, &other),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_token_garbage_rejected() {
        let secret = SecretString::from("k9#mP2$vL8@qR4!wN6^xT1&zB3*cF7%j");
        assert!(matches!(
            decode_token("not-a-token", &secret),
            Err(AuthError::InvalidToken)
        ));
    }
}
