//! Menu item repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use fenet_core::{MenuCategory, MenuItemFields, MenuItemId, Price};

use super::RepositoryError;
use crate::models::{MenuItem, MenuItemUpdate};

const COLUMNS: &str = "id, name, description, category, price, image_url, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct MenuItemRow {
    id: i32,
    name: String,
    description: String,
    category: MenuCategory,
    price: Decimal,
    image_url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<MenuItemRow> for MenuItem {
    type Error = RepositoryError;

    fn try_from(row: MenuItemRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price in database: {e}"))
        })?;

        Ok(Self {
            id: MenuItemId::new(row.id),
            name: row.name,
            description: row.description,
            category: row.category,
            price,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Result of a seed upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Repository for menu item database operations.
pub struct MenuItemRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MenuItemRepository<'a> {
    /// Create a new menu item repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List items ordered by category then name, optionally restricted to one category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is invalid.
    pub async fn list(
        &self,
        category: Option<MenuCategory>,
    ) -> Result<Vec<MenuItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, MenuItemRow>(&format!(
            r"
            SELECT {COLUMNS}
            FROM menu_item
            WHERE $1::menu_category IS NULL OR category = $1
            ORDER BY category, name, id
            "
        ))
        .bind(category)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a menu item by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: MenuItemId) -> Result<Option<MenuItem>, RepositoryError> {
        let row = sqlx::query_as::<_, MenuItemRow>(&format!(
            "SELECT {COLUMNS} FROM menu_item WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Insert a new menu item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, fields: &MenuItemFields) -> Result<MenuItem, RepositoryError> {
        let row = sqlx::query_as::<_, MenuItemRow>(&format!(
            r"
            INSERT INTO menu_item (name, description, category, price, image_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "
        ))
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.category)
        .bind(fields.price)
        .bind(&fields.image_url)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Apply a partial update in a single statement.
    ///
    /// Returns `None` if no item has this ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        id: MenuItemId,
        update: &MenuItemUpdate,
    ) -> Result<Option<MenuItem>, RepositoryError> {
        let row = sqlx::query_as::<_, MenuItemRow>(&format!(
            r"
            UPDATE menu_item
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                price = COALESCE($5, price),
                image_url = COALESCE($6, image_url),
                updated_at = now()
            WHERE id = $1
            RETURNING {COLUMNS}
            "
        ))
        .bind(id.as_i32())
        .bind(update.name.as_deref())
        .bind(update.description.as_deref())
        .bind(update.category)
        .bind(update.price)
        .bind(update.image_url.as_deref())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Delete a menu item. Returns `false` if no item had this ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: MenuItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM menu_item WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete every menu item, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM menu_item")
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Update the item with the same name, or insert it if none exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either statement fails.
    pub async fn upsert_by_name(
        &self,
        fields: &MenuItemFields,
    ) -> Result<UpsertOutcome, RepositoryError> {
        let updated = sqlx::query(
            r"
            UPDATE menu_item
            SET description = $2, category = $3, price = $4, image_url = $5,
                updated_at = now()
            WHERE name = $1
            ",
        )
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.category)
        .bind(fields.price)
        .bind(&fields.image_url)
        .execute(self.pool)
        .await?;

        if updated.rows_affected() > 0 {
            return Ok(UpsertOutcome::Updated);
        }

        self.create(fields).await?;
        Ok(UpsertOutcome::Inserted)
    }
}
