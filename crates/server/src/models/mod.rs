//! Domain records returned by the repositories and serialized by the API.

pub mod admin_user;
pub mod contact_message;
pub mod menu_item;
pub mod session;

pub use admin_user::AdminUser;
pub use contact_message::ContactMessage;
pub use menu_item::{MenuItem, MenuItemUpdate};
pub use session::{CurrentAdmin, keys as session_keys};
