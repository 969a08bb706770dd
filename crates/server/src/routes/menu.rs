//! Public menu listing.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use fenet_core::MenuCategory;

use crate::db::MenuItemRepository;
use crate::error::{AppError, Result};
use crate::extract::ApiQuery;
use crate::models::MenuItem;
use crate::state::AppState;

/// Query parameters for `GET /api/menu`.
#[derive(Debug, Default, Deserialize)]
pub struct MenuQuery {
    pub category: Option<String>,
}

/// List menu items ordered by category then name.
///
/// GET /api/menu[?category=drinks]
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<MenuQuery>,
) -> Result<Json<Vec<MenuItem>>> {
    let category = query
        .category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .map(str::parse::<MenuCategory>)
        .transpose()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let items = MenuItemRepository::new(state.pool()).list(category).await?;
    Ok(Json(items))
}
