//! Admin authentication service.
//!
//! Password login against Argon2id hashes stored in `admin_user`, plus the
//! account management used by the CLI.

mod error;

pub use error::AuthError;

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use fenet_core::AdminUsername;

use crate::db::{AdminUserRepository, RepositoryError};
use crate::models::{AdminUser, CurrentAdmin};

/// Minimum admin password length.
pub const MIN_PASSWORD_LENGTH: usize = 12;

/// Longest password accepted at login, in bytes.
pub const MAX_PASSWORD_BYTES: usize = 1024;

/// Values that are never accepted as an admin password.
const PLACEHOLDER_PASSWORDS: &[&str] = &[
    "password",
    "changeme",
    "admin",
    "fenet",
    "fenetcafe",
    "secret",
];

/// Hash verified when the username is unknown, so both failure paths cost the same.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("fenet-unknown-admin-placeholder").ok());

/// Authentication service.
pub struct AuthService<'a> {
    admins: AdminUserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            admins: AdminUserRepository::new(pool),
        }
    }

    /// Check a username/password pair.
    ///
    /// Unknown usernames and wrong passwords both yield
    /// `AuthError::InvalidCredentials`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on any mismatch.
    /// Returns `AuthError::Repository` if the lookup fails.
    pub async fn login(
        &self,
        username: &AdminUsername,
        password: &str,
    ) -> Result<CurrentAdmin, AuthError> {
        let Some(admin) = self.admins.get_by_username(username).await? else {
            if let Some(hash) = DUMMY_HASH.as_deref() {
                let _ = verify_password(password, hash);
            }
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(password, &admin.password_hash)?;

        Ok(CurrentAdmin {
            id: admin.id,
            username: admin.username,
        })
    }

    /// Create a new admin account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` or `AuthError::WeakPassword` for bad input.
    /// Returns `AuthError::UserAlreadyExists` if the username is taken.
    pub async fn create_admin(&self, username: &str, password: &str) -> Result<AdminUser, AuthError> {
        let username = AdminUsername::parse(username)?;
        validate_new_password(password)?;
        let hash = hash_password(password)?;

        self.admins
            .create(&username, &hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })
    }

    /// Replace an existing admin's password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` or `AuthError::WeakPassword` for bad input.
    /// Returns `AuthError::UserNotFound` if the admin does not exist.
    pub async fn set_password(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let username = AdminUsername::parse(username)?;
        validate_new_password(password)?;
        let hash = hash_password(password)?;

        self.admins
            .set_password_hash(&username, &hash)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })
    }
}

/// Check a new admin password against the account policy.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` describing the first violated rule.
pub fn validate_new_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AuthError::WeakPassword(format!(
            "password must be at most {MAX_PASSWORD_BYTES} bytes"
        )));
    }

    let lowered = password.trim().to_lowercase();
    let stripped = lowered.trim_end_matches(|c: char| c.is_ascii_digit() || c == '!');
    if PLACEHOLDER_PASSWORDS.contains(&stripped)
        || lowered.chars().all(|c| Some(c) == lowered.chars().next())
    {
        return Err(AuthError::WeakPassword(
            "password is a placeholder; choose a real password".to_owned(),
        ));
    }

    Ok(())
}

/// Hash a password with Argon2id and a random salt.
fn hash_password(password: &str) -> Result<String, AuthError> {
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
    fn test_hash_and_verify() {
        let hash = hash_password("injera-and-tibs-2024").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("injera-and-tibs-2024", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong-password-here", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_new_password_length() {
        assert!(validate_new_password("short-pass").is_err());
        assert!(validate_new_password("long-enough-pass").is_ok());
        assert!(validate_new_password(&"ab".repeat(600)).is_err());
    }

    #[test]
    fn test_new_password_rejects_placeholders() {
        assert!(validate_new_password("password1234").is_err());
        assert!(validate_new_password("ChangeMe!!!!!!").is_err());
        assert!(validate_new_password("aaaaaaaaaaaaaaaa").is_err());
        assert!(validate_new_password("buna-ceremony-at-noon").is_ok());
    }
}
