//! Admin user record.

use chrono::{DateTime, Utc};

use fenet_core::{AdminUserId, AdminUsername};

/// An account allowed to manage the menu and read contact messages.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub id: AdminUserId,
    pub username: AdminUsername,
    /// Argon2id PHC string.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
