//! Session middleware configuration.
//!
//! Sessions are stored server-side; the cookie only carries the session id.

use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use crate::config::ServerConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "fenet_session";

/// Sliding session lifetime in seconds (6 hours).
const SESSION_EXPIRY_SECONDS: i64 = 6 * 60 * 60;

/// Create the session layer over the given store.
///
/// Every request carrying a session saves it again, which pushes both the
/// stored expiry and the cookie's `Max-Age` forward.
///
/// Production passes a `PostgresStore`; its table is created by
/// `fenet migrate`.
#[must_use]
pub fn create_session_layer<S: SessionStore + Clone>(
    store: S,
    config: &ServerConfig,
) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.secure_cookies())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_always_save(true)
}
