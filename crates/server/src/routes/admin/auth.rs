//! Admin login, logout and session discovery.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use fenet_core::{AdminUsername, UsernameError};

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::extract::ApiJson;
use crate::middleware::{OptionalAdmin, clear_current_admin, set_current_admin};
use crate::services::auth::{AuthError, AuthService, MAX_PASSWORD_BYTES};
use crate::state::AppState;

/// Login request body.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Session state as seen by the admin client.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SessionStatus {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl SessionStatus {
    const fn signed_out() -> Self {
        Self {
            authenticated: false,
            username: None,
        }
    }
}

/// Check shape limits, then parse the username.
///
/// Only a missing or oversized username is a 400; any other malformed
/// username cannot belong to an account and fails like a wrong password.
fn parse_login(request: &LoginRequest) -> Result<(AdminUsername, &str)> {
    let username = request.username.as_deref().unwrap_or_default();
    let password = request.password.as_deref().unwrap_or_default();

    let username = match AdminUsername::parse(username) {
        Ok(username) => username,
        Err(e @ (UsernameError::Empty | UsernameError::TooLong { .. })) => {
            return Err(AppError::BadRequest(e.to_string()));
        }
        Err(_) => return Err(AuthError::InvalidCredentials.into()),
    };

    if password.is_empty() {
        return Err(AppError::BadRequest("password is required".to_owned()));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::BadRequest(format!(
            "password must be at most {MAX_PASSWORD_BYTES} bytes"
        )));
    }

    Ok((username, password))
}

/// Log an admin in.
///
/// POST /api/admin/login
#[instrument(skip_all, fields(username = tracing::field::Empty))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<SessionStatus>> {
    let (username, password) = parse_login(&request)?;
    tracing::Span::current().record("username", username.as_str());

    let admin = match AuthService::new(state.pool()).login(&username, password).await {
        Ok(admin) => admin,
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!("Failed admin login");
            return Err(AuthError::InvalidCredentials.into());
        }
        Err(e) => return Err(e.into()),
    };

    set_current_admin(&session, &admin)
        .await
        .map_err(|e| AppError::Internal(format!("failed to store session: {e}")))?;
    set_sentry_user(&admin.id, admin.username.as_str());

    tracing::info!("Admin logged in");
    Ok(Json(SessionStatus {
        authenticated: true,
        username: Some(admin.username.to_string()),
    }))
}

/// Log out. Safe to call without a session.
///
/// POST /api/admin/logout
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Json<SessionStatus>> {
    clear_current_admin(&session)
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))?;
    clear_sentry_user();

    Ok(Json(SessionStatus::signed_out()))
}

/// Report whether the caller holds an admin session. Never 401.
///
/// GET /api/admin/session
pub async fn session(OptionalAdmin(admin): OptionalAdmin) -> Json<SessionStatus> {
    Json(admin.map_or_else(SessionStatus::signed_out, |admin| SessionStatus {
        authenticated: true,
        username: Some(admin.username.to_string()),
    }))
}
