//! Seed the menu from a YAML file.
//!
//! Items are matched by name: an existing item with the same name is
//! overwritten, anything else is inserted. `--wipe` empties the menu first.
//!
//! ```yaml
//! items:
//!   - name: Chechebsa
//!     description: Pan-fried flatbread with berbere and spiced butter.
//!     category: breakfast
//!     price: 140
//!     image_url: /images/chechebsa.jpg
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

use fenet_core::{MenuItemFields, Price};
use fenet_server::db::{MenuItemRepository, UpsertOutcome};

use super::connect;

/// Menu seed file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuSeed {
    pub items: Vec<SeedItem>,
}

/// One menu entry as written in the seed file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedItem {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Validate every entry, returning the parsed fields or one message per bad entry.
pub fn validate(seed: &MenuSeed) -> Result<Vec<MenuItemFields>, Vec<String>> {
    let mut fields = Vec::with_capacity(seed.items.len());
    let mut errors = Vec::new();

    for (index, item) in seed.items.iter().enumerate() {
        let parsed = Price::from_f64(item.price)
            .map_err(Into::into)
            .and_then(|price| {
                MenuItemFields::parse(
                    &item.name,
                    &item.description,
                    &item.category,
                    price,
                    item.image_url.as_deref(),
                )
            });
        match parsed {
            Ok(f) => fields.push(f),
            Err(e) => errors.push(format!("item {} ({}): {e}", index + 1, item.name)),
        }
    }

    if errors.is_empty() {
        Ok(fields)
    } else {
        Err(errors)
    }
}

/// Upsert the menu from `file_path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, any entry is
/// invalid, or a database operation fails. Nothing is written when the
/// file is invalid.
pub async fn menu(file_path: &str, wipe: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading menu from file");

    // Read and validate YAML before connecting to database
    let content = tokio::fs::read_to_string(path).await?;
    let seed: MenuSeed = serde_yaml::from_str(&content)?;

    let items = match validate(&seed) {
        Ok(items) => items,
        Err(errors) => {
            error!("Menu validation failed:");
            for err in &errors {
                error!("  - {err}");
            }
            return Err(format!("{} validation errors found", errors.len()).into());
        }
    };

    info!(items = items.len(), "Menu validated successfully");

    let pool = connect().await?;
    let repo = MenuItemRepository::new(&pool);

    if wipe {
        let removed = repo.delete_all().await?;
        info!(removed, "Wiped existing menu");
    }

    let mut inserted = 0_usize;
    let mut updated = 0_usize;
    for item in &items {
        match repo.upsert_by_name(item).await? {
            UpsertOutcome::Inserted => inserted += 1,
            UpsertOutcome::Updated => updated += 1,
        }
    }

    info!("Seeding complete!");
    info!("  Items inserted: {inserted}");
    info!("  Items updated: {updated}");

    pool.close().await;
    Ok(())
}
