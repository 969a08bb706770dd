//! Fenet Cafe Core - Shared domain types.
//!
//! This crate provides the types used across the Fenet Cafe components:
//! - `server` - Public menu/contact API and the session-gated admin API
//! - `cli` - Migrations, menu seeding and admin user management
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP. Every untrusted input the site accepts is parsed into one
//! of these types before it reaches the store.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, emails, contact fields, menu fields
//!   and admin usernames

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
