//! Integration tests for Fenet Cafe.
//!
//! These run against a live server and its database. In-process router
//! tests live next to the routes in `fenet-server`.
//!
//! # Running Tests
//!
//! ```bash
//! # Prepare the database and start the server
//! cargo run -p fenet-cli -- migrate
//! cargo run -p fenet-server &
//!
//! # Run integration tests
//! cargo test -p fenet-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `FENET_TEST_BASE_URL` - Server under test (default: `http://localhost:5000`)
//! - `FENET_DATABASE_URL` - Database the server uses; tests create their own
//!   admin accounts in it

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::error::Error;

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::SecretString;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use fenet_server::services::auth::AuthService;

/// Password given to every test admin.
pub const TEST_ADMIN_PASSWORD: &str = "integration-test-password";

/// Shared handles for one integration test.
pub struct TestContext {
    pub base_url: String,
    pub pool: PgPool,
}

impl TestContext {
    /// Connect to the database the server under test uses.
    ///
    /// # Errors
    ///
    /// Returns an error if `FENET_DATABASE_URL` is unset or unreachable.
    pub async fn new() -> Result<Self, Box<dyn Error>> {
        let base_url = std::env::var("FENET_TEST_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5000".to_string());
        let database_url = std::env::var("FENET_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .map(SecretString::from)
            .map_err(|_| "FENET_DATABASE_URL not set")?;
        let pool = fenet_server::db::create_pool(&database_url).await?;

        Ok(Self { base_url, pool })
    }

    /// Absolute URL for a server path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    /// A cookie-keeping client with its own client IP, so rate limits
    /// never leak between tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built.
    pub fn client(&self) -> Result<Client, Box<dyn Error>> {
        let [a, b, c, ..] = Uuid::new_v4().into_bytes();
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_str(&format!("10.{a}.{b}.{c}"))?,
        );

        Ok(Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .build()?)
    }

    /// Create a fresh admin account and return its username.
    ///
    /// # Errors
    ///
    /// Returns an error if the account cannot be created.
    pub async fn create_admin(&self) -> Result<String, Box<dyn Error>> {
        let username = format!("it-{}", Uuid::new_v4().simple());
        AuthService::new(&self.pool)
            .create_admin(&username, TEST_ADMIN_PASSWORD)
            .await?;
        Ok(username)
    }

    /// A client holding a signed-in admin session.
    ///
    /// # Errors
    ///
    /// Returns an error if the admin cannot be created or login fails.
    pub async fn admin_client(&self) -> Result<Client, Box<dyn Error>> {
        let username = self.create_admin().await?;
        let client = self.client()?;

        let resp = client
            .post(self.url("/api/admin/login"))
            .json(&json!({ "username": username, "password": TEST_ADMIN_PASSWORD }))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(format!("login failed with {}", resp.status()).into());
        }

        Ok(client)
    }
}
