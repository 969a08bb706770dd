//! Contact message inbox.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::db::ContactMessageRepository;
use crate::error::Result;
use crate::models::ContactMessage;
use crate::state::AppState;

/// List contact messages, newest first.
///
/// GET /api/admin/messages
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ContactMessage>>> {
    let messages = ContactMessageRepository::new(state.pool())
        .list_newest_first()
        .await?;
    Ok(Json(messages))
}
