//! HTTP route handlers and router assembly.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                  - Liveness
//! GET    /health/ready            - Readiness (database)
//!
//! # Public API
//! GET    /api/menu[?category=]    - Menu listing
//! POST   /api/contact             - Contact form (rate limited)
//!
//! # Admin API
//! POST   /api/admin/login         - Log in (rate limited)
//! POST   /api/admin/logout        - Log out
//! GET    /api/admin/session       - Session status
//! GET    /api/admin/messages      - Contact inbox          (gated)
//! POST   /api/admin/upload        - Image upload           (gated)
//! POST   /api/admin/menu          - Create item            (gated)
//! PUT    /api/admin/menu/{id}     - Update item            (gated)
//! DELETE /api/admin/menu/{id}     - Delete item            (gated)
//!
//! # Static
//! GET    /images/*                - Bundled menu photos
//! GET    /uploads/*               - Uploaded images
//! GET    /*                       - Client bundle (if configured)
//! ```

pub mod admin;
pub mod contact;
pub mod health;
pub mod menu;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::{from_fn, map_response},
    routing::{get, post, put},
};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::SessionStore;
use tracing::Span;

use crate::config::ServerConfig;
use crate::error::AppError;
use crate::middleware::{
    contact_rate_limiter, cors_layer, create_session_layer, login_rate_limiter,
    rate_limit_json_body, request_id_middleware, require_admin, security_headers_middleware,
};
use crate::state::AppState;

/// Build the complete application router.
pub fn build_router<S>(state: AppState, session_store: S) -> Router
where
    S: SessionStore + Clone,
{
    let routes = routes(state.config());
    with_middleware(routes, state, session_store)
}

/// All routes without the shared middleware stack.
pub fn routes(config: &ServerConfig) -> Router<AppState> {
    let router = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes(config))
        .nest_service("/images", ServeDir::new(&config.images_dir))
        .nest_service("/uploads", ServeDir::new(&config.upload.dir));

    match &config.client_dir {
        Some(dir) => router.fallback_service(
            ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
        ),
        None => router.fallback(not_found),
    }
}

/// Wrap routes in sessions, headers, CORS, request ids and tracing.
pub fn with_middleware<S>(routes: Router<AppState>, state: AppState, session_store: S) -> Router
where
    S: SessionStore + Clone,
{
    let config = state.config();
    let session_layer = create_session_layer(session_store, config);
    let cors = cors_layer(&config.cors_origins);

    routes
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(cors)
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

fn api_routes(config: &ServerConfig) -> Router<AppState> {
    let contact = Router::new()
        .route("/contact", post(contact::submit))
        .layer(contact_rate_limiter())
        .layer(map_response(rate_limit_json_body));

    Router::new()
        .route("/menu", get(menu::list))
        .merge(contact)
        .nest("/admin", admin_routes(config))
        .fallback(not_found)
}

fn admin_routes(config: &ServerConfig) -> Router<AppState> {
    let login = Router::new()
        .route("/login", post(admin::auth::login))
        .layer(login_rate_limiter())
        .layer(map_response(rate_limit_json_body));

    let gated = Router::new()
        .route("/messages", get(admin::messages::list))
        .route(
            "/upload",
            post(admin::upload::upload).layer(DefaultBodyLimit::max(
                config.upload.max_bytes + admin::upload::MULTIPART_OVERHEAD_BYTES,
            )),
        )
        .route("/menu", post(admin::menu::create))
        .route(
            "/menu/{id}",
            put(admin::menu::update).delete(admin::menu::delete),
        )
        .route_layer(from_fn(require_admin));

    Router::new()
        .route("/logout", post(admin::auth::logout))
        .route("/session", get(admin::auth::session))
        .merge(login)
        .merge(gated)
}

async fn not_found() -> AppError {
    AppError::NotFound("Not found".to_owned())
}

#[cfg(test)]
mod tests;
