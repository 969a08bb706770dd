//! Public contact form.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use fenet_core::{ContactMessageId, ContactSubmission};

use crate::db::ContactMessageRepository;
use crate::error::Result;
use crate::extract::ApiJson;
use crate::state::AppState;

/// Message shown to the visitor after a successful submission.
pub const THANK_YOU_MESSAGE: &str = "Thank you for your message! We will be in touch soon.";

/// Contact form body. Missing fields count as empty.
#[derive(Debug, Default, Deserialize)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

/// Response for a stored submission.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub message: &'static str,
    pub id: ContactMessageId,
}

/// Validate and store a contact message.
///
/// POST /api/contact
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<ContactForm>,
) -> Result<(StatusCode, Json<ContactResponse>)> {
    let submission = ContactSubmission::parse(
        form.name.as_deref().unwrap_or_default(),
        form.email.as_deref().unwrap_or_default(),
        form.message.as_deref().unwrap_or_default(),
    )?;

    let stored = ContactMessageRepository::new(state.pool())
        .create(&submission)
        .await?;

    tracing::info!(id = %stored.id, "Contact message received");

    Ok((
        StatusCode::CREATED,
        Json(ContactResponse {
            message: THANK_YOU_MESSAGE,
            id: stored.id,
        }),
    ))
}
