//! Menu item record and partial update.

use chrono::{DateTime, Utc};
use serde::Serialize;

use fenet_core::{MenuCategory, MenuItemId, Price};

/// A dish or drink on the menu.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    #[serde(rename = "_id")]
    pub id: MenuItemId,
    pub name: String,
    pub description: String,
    pub category: MenuCategory,
    pub price: Price,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<MenuCategory>,
    pub price: Option<Price>,
    pub image_url: Option<String>,
}

impl MenuItemUpdate {
    /// Whether the update leaves every field unchanged.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.image_url.is_none()
    }
}
