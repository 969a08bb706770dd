//! Menu management.

use axum::{
    Json,
    extract::{FromRequestParts, Path, State},
    http::{StatusCode, request::Parts},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use fenet_core::{MenuItemError, MenuItemFields, MenuItemId, Price, PriceError};

use crate::db::MenuItemRepository;
use crate::error::{AppError, Result};
use crate::extract::ApiJson;
use crate::models::{MenuItem, MenuItemUpdate};
use crate::state::AppState;

const NOT_FOUND_MESSAGE: &str = "Menu item not found";

/// Menu item id from the path. Anything that is not an `i32` is a 404.
pub struct MenuItemPath(pub MenuItemId);

impl<S> FromRequestParts<S> for MenuItemPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state).await?;
        raw.parse()
            .map(Self)
            .map_err(|_| AppError::NotFound(NOT_FOUND_MESSAGE.to_owned()))
    }
}

/// Create/update body. Every field is optional at this layer; create
/// enforces the required ones.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    /// A JSON number or a numeric string.
    pub price: Option<Value>,
    pub image_url: Option<String>,
}

impl MenuItemInput {
    /// Validate as a new item.
    ///
    /// # Errors
    ///
    /// Returns the first missing or invalid field.
    pub fn into_fields(self) -> std::result::Result<MenuItemFields, MenuItemError> {
        let price = parse_price(self.price.as_ref().ok_or(MenuItemError::Required("price"))?)?;

        MenuItemFields::parse(
            self.name.as_deref().unwrap_or_default(),
            self.description.as_deref().unwrap_or_default(),
            self.category
                .as_deref()
                .filter(|c| !c.trim().is_empty())
                .ok_or(MenuItemError::Required("category"))?,
            price,
            self.image_url.as_deref(),
        )
    }

    /// Validate provided fields only.
    ///
    /// # Errors
    ///
    /// Returns the first invalid provided field.
    pub fn into_update(self) -> std::result::Result<MenuItemUpdate, MenuItemError> {
        Ok(MenuItemUpdate {
            name: self
                .name
                .as_deref()
                .map(MenuItemFields::parse_name)
                .transpose()?,
            description: self
                .description
                .as_deref()
                .map(MenuItemFields::parse_description)
                .transpose()?,
            category: self.category.as_deref().map(str::parse).transpose()?,
            price: self.price.as_ref().map(parse_price).transpose()?,
            image_url: self
                .image_url
                .as_deref()
                .map(|url| MenuItemFields::parse_image_url(Some(url)))
                .transpose()?,
        })
    }
}

/// Accept `12.5` or `"12.5"`.
fn parse_price(value: &Value) -> std::result::Result<Price, MenuItemError> {
    let price = match value {
        Value::Number(n) => n.as_f64().ok_or(PriceError::NotANumber).and_then(Price::from_f64),
        Value::String(s) => s.parse(),
        _ => Err(PriceError::NotANumber),
    };
    Ok(price?)
}

/// Deletion acknowledgement.
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub message: &'static str,
}

/// Create a menu item.
///
/// POST /api/admin/menu
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<MenuItemInput>,
) -> Result<(StatusCode, Json<MenuItem>)> {
    let fields = input.into_fields()?;
    let item = MenuItemRepository::new(state.pool()).create(&fields).await?;

    tracing::info!(id = %item.id, name = %item.name, "Menu item created");
    Ok((StatusCode::CREATED, Json(item)))
}

/// Partially update a menu item.
///
/// PUT /api/admin/menu/{id}
#[instrument(skip_all, fields(id = %id))]
pub async fn update(
    State(state): State<AppState>,
    MenuItemPath(id): MenuItemPath,
    ApiJson(input): ApiJson<MenuItemInput>,
) -> Result<Json<MenuItem>> {
    let update = input.into_update()?;
    let repo = MenuItemRepository::new(state.pool());

    let item = if update.is_empty() {
        repo.get_by_id(id).await?
    } else {
        repo.update(id, &update).await?
    };

    let item = item.ok_or_else(|| AppError::NotFound(NOT_FOUND_MESSAGE.to_owned()))?;
    tracing::info!("Menu item updated");
    Ok(Json(item))
}

/// Delete a menu item.
///
/// DELETE /api/admin/menu/{id}
#[instrument(skip_all, fields(id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    MenuItemPath(id): MenuItemPath,
) -> Result<Json<DeletedResponse>> {
    if !MenuItemRepository::new(state.pool()).delete(id).await? {
        return Err(AppError::NotFound(NOT_FOUND_MESSAGE.to_owned()));
    }

    tracing::info!("Menu item deleted");
    Ok(Json(DeletedResponse {
        message: "Menu item deleted",
    }))
}
