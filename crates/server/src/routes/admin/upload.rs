//! Menu image upload.

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
};
use serde::Serialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::services::uploads::UploadError;
use crate::state::AppState;

/// Multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";

/// Extra room for multipart framing on top of the file size limit.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Public location of the stored image.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Store an uploaded menu image.
///
/// POST /api/admin/upload (multipart, field `image`)
#[instrument(skip_all)]
pub async fn upload(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    let mut multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let store = state.uploads();
    let max = store.max_bytes();

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error(max))? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let declared_type = field.content_type().map(str::to_owned);
        let mut bytes = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error(max))? {
            if bytes.len() + chunk.len() > max {
                return Err(UploadError::TooLarge { max }.into());
            }
            bytes.extend_from_slice(&chunk);
        }

        let url = store.store(declared_type.as_deref(), &bytes).await?;
        return Ok((StatusCode::CREATED, Json(UploadResponse { url })));
    }

    Err(UploadError::MissingFile.into())
}

fn multipart_error(max: usize) -> impl Fn(axum::extract::multipart::MultipartError) -> AppError {
    move |e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            UploadError::TooLarge { max }.into()
        } else {
            UploadError::Malformed(e.body_text()).into()
        }
    }
}
