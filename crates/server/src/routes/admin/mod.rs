//! Admin API.
//!
//! Login, logout and session discovery are open; everything else sits behind
//! the session gate.

pub mod auth;
pub mod menu;
pub mod messages;
pub mod upload;
