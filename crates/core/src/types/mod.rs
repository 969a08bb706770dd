//! Core types for Fenet Cafe.
//!
//! This module provides type-safe wrappers for the site's domain concepts.

pub mod contact;
pub mod email;
pub mod id;
pub mod menu;
pub mod price;
pub mod username;

pub use contact::{ContactError, ContactName, ContactSubmission, MessageBody};
pub use email::{Email, EmailError};
pub use id::*;
pub use menu::{MenuCategory, MenuCategoryError, MenuItemError, MenuItemFields};
pub use price::{Price, PriceError};
pub use username::{AdminUsername, UsernameError};
