//! Business services sitting between route handlers and repositories.

pub mod auth;
pub mod uploads;
