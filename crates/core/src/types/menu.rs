//! Menu item types.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use super::price::{Price, PriceError};

/// Unknown menu category.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("category must be one of: breakfast, lunch_dinner, baked_goods, drinks (got '{0}')")]
pub struct MenuCategoryError(pub String);

/// Menu section an item is listed under.
///
/// Declaration order is display order; the database enum uses the same order
/// so `ORDER BY category` matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "menu_category", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum MenuCategory {
    Breakfast,
    LunchDinner,
    BakedGoods,
    Drinks,
}

impl MenuCategory {
    /// All categories in display order.
    pub const ALL: [Self; 4] = [
        Self::Breakfast,
        Self::LunchDinner,
        Self::BakedGoods,
        Self::Drinks,
    ];

    /// Wire/database value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::LunchDinner => "lunch_dinner",
            Self::BakedGoods => "baked_goods",
            Self::Drinks => "drinks",
        }
    }

    /// Human-readable section heading.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Breakfast => "Breakfast",
            Self::LunchDinner => "Lunch & Dinner",
            Self::BakedGoods => "Baked Goods",
            Self::Drinks => "Drinks",
        }
    }
}

impl fmt::Display for MenuCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MenuCategory {
    type Err = MenuCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| MenuCategoryError(s.to_owned()))
    }
}

/// Errors that can occur when validating menu item fields.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MenuItemError {
    /// A required field is missing or blank.
    #[error("{0} is required")]
    Required(&'static str),
    /// A field is longer than allowed.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Field name.
        field: &'static str,
        /// Maximum allowed length.
        max: usize,
    },
    /// Category is outside the enumerated set.
    #[error(transparent)]
    Category(#[from] MenuCategoryError),
    /// Price failed validation.
    #[error(transparent)]
    Price(#[from] PriceError),
    /// Image URL is neither a site path nor an http(s) URL.
    #[error("imageUrl must start with '/', 'http://' or 'https://'")]
    InvalidImageUrl,
}

/// Validated fields of a menu item, as written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItemFields {
    pub name: String,
    pub description: String,
    pub category: MenuCategory,
    pub price: Price,
    pub image_url: String,
}

impl MenuItemFields {
    /// Maximum item name length in characters.
    pub const MAX_NAME_LENGTH: usize = 120;
    /// Maximum description length in characters.
    pub const MAX_DESCRIPTION_LENGTH: usize = 1000;
    /// Maximum image URL length in characters.
    pub const MAX_IMAGE_URL_LENGTH: usize = 2048;
    /// Image shown when an item has none.
    pub const DEFAULT_IMAGE_URL: &'static str = "/images/placeholder.jpg";

    /// Validate a complete set of fields, as for a newly created item.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint, checked in field order.
    pub fn parse(
        name: &str,
        description: &str,
        category: &str,
        price: Price,
        image_url: Option<&str>,
    ) -> Result<Self, MenuItemError> {
        Ok(Self {
            name: Self::parse_name(name)?,
            description: Self::parse_description(description)?,
            category: category.parse()?,
            price,
            image_url: Self::parse_image_url(image_url)?,
        })
    }

    /// Validate and trim an item name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or too long.
    pub fn parse_name(s: &str) -> Result<String, MenuItemError> {
        required_text(s, "name", Self::MAX_NAME_LENGTH)
    }

    /// Validate and trim an item description.
    ///
    /// # Errors
    ///
    /// Returns an error if the description is blank or too long.
    pub fn parse_description(s: &str) -> Result<String, MenuItemError> {
        required_text(s, "description", Self::MAX_DESCRIPTION_LENGTH)
    }

    /// Validate an image URL, substituting the placeholder when blank.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is too long, contains whitespace, or is
    /// not a site-relative path or http(s) URL.
    pub fn parse_image_url(s: Option<&str>) -> Result<String, MenuItemError> {
        let s = s.map_or("", str::trim);
        if s.is_empty() {
            return Ok(Self::DEFAULT_IMAGE_URL.to_owned());
        }
        if s.chars().count() > Self::MAX_IMAGE_URL_LENGTH {
            return Err(MenuItemError::TooLong {
                field: "imageUrl",
                max: Self::MAX_IMAGE_URL_LENGTH,
            });
        }
        let allowed_prefix = (s.starts_with('/') && !s.starts_with("//"))
            || s.starts_with("http://")
            || s.starts_with("https://");
        if !allowed_prefix || s.chars().any(char::is_whitespace) {
            return Err(MenuItemError::InvalidImageUrl);
        }
        Ok(s.to_owned())
    }
}

fn required_text(s: &str, field: &'static str, max: usize) -> Result<String, MenuItemError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(MenuItemError::Required(field));
    }
    if s.chars().count() > max {
        return Err(MenuItemError::TooLong { field, max });
    }
    Ok(s.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_category_accepts_enumerated_values() {
        assert_eq!("drinks".parse::<MenuCategory>().unwrap(), MenuCategory::Drinks);
        assert_eq!(
            "lunch_dinner".parse::<MenuCategory>().unwrap(),
            MenuCategory::LunchDinner
        );
        for category in MenuCategory::ALL {
            assert_eq!(category.as_str().parse::<MenuCategory>().unwrap(), category);
        }
    }

    #[test]
    fn test_category_rejects_snacks() {
        let err = "snacks".parse::<MenuCategory>().unwrap_err();
        assert_eq!(err, MenuCategoryError("snacks".to_owned()));
        assert!(err.to_string().contains("breakfast, lunch_dinner, baked_goods, drinks"));
    }

    #[test]
    fn test_category_is_case_sensitive() {
        assert!("Drinks".parse::<MenuCategory>().is_err());
    }

    #[test]
    fn test_category_order_matches_menu_sections() {
        let mut shuffled = vec![
            MenuCategory::Drinks,
            MenuCategory::Breakfast,
            MenuCategory::BakedGoods,
            MenuCategory::LunchDinner,
        ];
        shuffled.sort();
        assert_eq!(shuffled, MenuCategory::ALL.to_vec());
    }

    #[test]
    fn test_category_serde_uses_snake_case() {
        let json = serde_json::to_string(&MenuCategory::BakedGoods).unwrap();
        assert_eq!(json, "\"baked_goods\"");
        assert_eq!(MenuCategory::LunchDinner.label(), "Lunch & Dinner");
    }

    #[test]
    fn test_parse_full_item() {
        let price = Price::from_f64(85.0).unwrap();
        let fields =
            MenuItemFields::parse(" Buna ", "Ethiopian coffee", "drinks", price, None).unwrap();
        assert_eq!(fields.name, "Buna");
        assert_eq!(fields.category, MenuCategory::Drinks);
        assert_eq!(fields.image_url, MenuItemFields::DEFAULT_IMAGE_URL);

        let err = MenuItemFields::parse("Buna", "Coffee", "snacks", price, None).unwrap_err();
        assert!(matches!(err, MenuItemError::Category(_)));
    }

    #[test]
    fn test_name_and_description_required() {
        assert_eq!(
            MenuItemFields::parse_name("   "),
            Err(MenuItemError::Required("name"))
        );
        assert_eq!(
            MenuItemFields::parse_description(""),
            Err(MenuItemError::Required("description"))
        );
        assert_eq!(MenuItemFields::parse_name(" Ful ").unwrap(), "Ful");
    }

    #[test]
    fn test_name_too_long() {
        assert_eq!(
            MenuItemFields::parse_name(&"x".repeat(121)),
            Err(MenuItemError::TooLong {
                field: "name",
                max: 120
            })
        );
    }

    #[test]
    fn test_image_url_defaults_when_blank() {
        assert_eq!(
            MenuItemFields::parse_image_url(None).unwrap(),
            MenuItemFields::DEFAULT_IMAGE_URL
        );
        assert_eq!(
            MenuItemFields::parse_image_url(Some("  ")).unwrap(),
            MenuItemFields::DEFAULT_IMAGE_URL
        );
    }

    #[test]
    fn test_image_url_accepts_paths_and_http() {
        assert!(MenuItemFields::parse_image_url(Some("/images/buna.jpg")).is_ok());
        assert!(MenuItemFields::parse_image_url(Some("/uploads/a.png")).is_ok());
        assert!(MenuItemFields::parse_image_url(Some("https://cdn.example.com/x.jpg")).is_ok());
    }

    #[test]
    fn test_image_url_rejects_other_schemes() {
        assert_eq!(
            MenuItemFields::parse_image_url(Some("javascript:alert(1)")),
            Err(MenuItemError::InvalidImageUrl)
        );
        assert_eq!(
            MenuItemFields::parse_image_url(Some("//evil.example.com/x.jpg")),
            Err(MenuItemError::InvalidImageUrl)
        );
        assert_eq!(
            MenuItemFields::parse_image_url(Some("/images/my photo.jpg")),
            Err(MenuItemError::InvalidImageUrl)
        );
    }
}
