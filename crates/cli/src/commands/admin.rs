//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create an admin (the password may come from FENET_ADMIN_PASSWORD instead)
//! fenet admin create -u owner -p 'correct horse battery staple'
//!
//! # Reset a forgotten password
//! fenet admin set-password -u owner
//! ```
//!
//! Passwords must be at least 12 characters and are stored as Argon2id
//! hashes; the plaintext is never logged.

use fenet_server::services::auth::{AuthError, AuthService};
use thiserror::Error;

use super::{CommandError, connect};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Connect(#[from] CommandError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Create a new admin user, returning its id.
pub async fn create_user(username: &str, password: &str) -> Result<i32, AdminError> {
    let pool = connect().await?;

    tracing::info!("Creating admin user: {}", username.trim());
    let admin = AuthService::new(&pool).create_admin(username, password).await?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Username: {}",
        admin.id,
        admin.username
    );

    pool.close().await;
    Ok(admin.id.as_i32())
}

/// Replace an existing admin user's password.
///
/// Sessions already signed in as this admin stay valid until they expire.
pub async fn set_password(username: &str, password: &str) -> Result<(), AdminError> {
    let pool = connect().await?;

    AuthService::new(&pool).set_password(username, password).await?;
    tracing::info!("Password updated for admin user: {}", username.trim());

    pool.close().await;
    Ok(())
}
