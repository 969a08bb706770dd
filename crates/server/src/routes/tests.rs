//! In-process router tests.
//!
//! The pool connects lazily to an address nothing listens on, so any test
//! that reaches the store would fail; `pool.size() == 0` shows a request was
//! answered without touching the database.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
    routing::post,
};
use secrecy::ExposeSecret;
use serde_json::{Value, json};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, Session};

use fenet_core::{AdminUserId, AdminUsername};

use super::{routes, with_middleware};
use crate::config::ServerConfig;
use crate::middleware::set_current_admin;
use crate::models::CurrentAdmin;
use crate::state::AppState;

const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01";
const BOUNDARY: &str = "fenet-test-boundary";

struct TestApp {
    router: Router,
    pool: PgPool,
    config: ServerConfig,
}

impl TestApp {
    fn new() -> Self {
        let mut config = ServerConfig::for_tests();
        config.upload.dir =
            std::env::temp_dir().join(format!("fenet-router-test-{}", uuid::Uuid::new_v4()));

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy(config.database_url.expose_secret())
            .unwrap();

        let state = AppState::new(config.clone(), pool.clone());
        let routes = routes(&config).route("/test/login", post(test_login));
        let router = with_middleware(routes, state, MemoryStore::default());

        Self {
            router,
            pool,
            config,
        }
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Log in through the test-only route and return the session cookie.
    async fn login(&self) -> String {
        let response = self
            .send(
                Request::post("/test/login")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        session_cookie(&response)
    }

    fn assert_store_untouched(&self) {
        assert_eq!(self.pool.size(), 0, "request reached the database");
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.config.upload.dir);
    }
}

async fn test_login(session: Session) -> StatusCode {
    let admin = CurrentAdmin {
        id: AdminUserId::new(1),
        username: AdminUsername::parse("fenet.admin").unwrap(),
    };
    set_current_admin(&session, &admin).await.unwrap();
    StatusCode::NO_CONTENT
}

fn session_cookie(response: &Response) -> String {
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    set_cookie.split(';').next().unwrap().to_owned()
}

fn json_request(method: &str, uri: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
}

fn with_json(builder: axum::http::request::Builder, body: &Value) -> Request<Body> {
    builder.body(Body::from(body.to_string())).unwrap()
}

fn multipart_body(field: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"upload\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_request(cookie: &str, body: Vec<u8>) -> Request<Body> {
    Request::post("/api/admin/upload")
        .header(header::COOKIE, cookie)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn contact(app: &TestApp, ip: &str, body: &Value) -> Response {
    let request = with_json(
        json_request("POST", "/api/contact").header("x-forwarded-for", ip),
        body,
    );
    app.send(request).await
}

// =============================================================================
// Health, headers, fallbacks
// =============================================================================

#[tokio::test]
async fn test_health_is_ok() {
    let app = TestApp::new();
    let response = app.send(Request::get("/health").body(Body::empty()).unwrap()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn test_security_headers_and_request_id() {
    let app = TestApp::new();
    let response = app
        .send(
            Request::get("/api/admin/session")
                .header("x-request-id", "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    let headers = response.headers();
    assert_eq!(headers["x-request-id"], "req-123");
    assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
    assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(headers[header::CACHE_CONTROL], "no-store");
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let app = TestApp::new();
    let response = app.send(Request::get("/health").body(Body::empty()).unwrap()).await;

    let id = response.headers()["x-request-id"].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());
}

#[tokio::test]
async fn test_unknown_api_route_is_json_404() {
    let app = TestApp::new();
    let response = app
        .send(Request::get("/api/reservations").body(Body::empty()).unwrap())
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Not found");
}

// =============================================================================
// Session gate
// =============================================================================

#[tokio::test]
async fn test_admin_routes_require_session() {
    let app = TestApp::new();
    let item = json!({"name": "Buna", "description": "Coffee", "category": "drinks", "price": 85});

    let requests = vec![
        Request::get("/api/admin/messages").body(Body::empty()).unwrap(),
        with_json(json_request("POST", "/api/admin/menu"), &item),
        with_json(json_request("PUT", "/api/admin/menu/1"), &item),
        Request::delete("/api/admin/menu/1").body(Body::empty()).unwrap(),
        multipart_request("", multipart_body("image", "image/png", PNG)),
    ];

    for request in requests {
        let uri = request.uri().clone();
        let response = app.send(request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(
            body_json(response).await,
            json!({"message": "Authentication required"}),
            "{uri}"
        );
    }

    app.assert_store_untouched();
    assert!(!app.config.upload.dir.exists());
}

#[tokio::test]
async fn test_gate_ignores_unknown_session_cookie() {
    let app = TestApp::new();
    let response = app
        .send(
            Request::get("/api/admin/messages")
                .header(header::COOKIE, "fenet_session=not-a-real-session")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    app.assert_store_untouched();
}

#[tokio::test]
async fn test_session_status_signed_out() {
    let app = TestApp::new();
    let response = app
        .send(Request::get("/api/admin/session").body(Body::empty()).unwrap())
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"authenticated": false}));
}

#[tokio::test]
async fn test_session_status_signed_in_then_logout() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let response = app
        .send(
            Request::get("/api/admin/session")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(
        body_json(response).await,
        json!({"authenticated": true, "username": "fenet.admin"})
    );

    let response = app
        .send(
            Request::post("/api/admin/logout")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"authenticated": false}));

    let response = app
        .send(
            Request::get("/api/admin/session")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(body_json(response).await, json!({"authenticated": false}));
}

#[tokio::test]
async fn test_active_session_is_renewed() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let response = app
        .send(
            Request::get("/api/admin/session")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let renewed = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie re-issued")
        .to_str()
        .unwrap();
    assert!(renewed.starts_with("fenet_session="));
    assert!(renewed.contains("Max-Age=21600"));
    assert_eq!(session_cookie(&response), cookie);
}

#[tokio::test]
async fn test_signed_out_request_gets_no_cookie() {
    let app = TestApp::new();
    let response = app
        .send(Request::get("/api/admin/session").body(Body::empty()).unwrap())
        .await;
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_logout_without_session_is_ok() {
    let app = TestApp::new();
    let response = app
        .send(Request::post("/api/admin/logout").body(Body::empty()).unwrap())
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"authenticated": false}));
}

// =============================================================================
// Login validation
// =============================================================================

#[tokio::test]
async fn test_login_rejects_missing_fields() {
    let app = TestApp::new();
    let body = json!({"password": "whatever-it-is"});
    let response = app
        .send(with_json(
            json_request("POST", "/api/admin/login").header("x-forwarded-for", "192.0.2.1"),
            &body,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "username is required");
    app.assert_store_untouched();
}

#[tokio::test]
async fn test_login_rejects_malformed_json() {
    let app = TestApp::new();
    let response = app
        .send(
            Request::post("/api/admin/login")
                .header(header::CONTENT_TYPE, "application/json")
                .header("x-forwarded-for", "192.0.2.2")
                .body(Body::from("{\"username\": "))
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["message"].is_string());
}

// =============================================================================
// Menu
// =============================================================================

#[tokio::test]
async fn test_menu_rejects_unknown_category_filter() {
    let app = TestApp::new();
    let response = app
        .send(Request::get("/api/menu?category=snacks").body(Body::empty()).unwrap())
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let message = body_json(response).await["message"].as_str().unwrap().to_owned();
    assert!(message.contains("breakfast, lunch_dinner, baked_goods, drinks"));
    app.assert_store_untouched();
}

#[tokio::test]
async fn test_create_menu_item_rejects_snacks() {
    let app = TestApp::new();
    let cookie = app.login().await;
    let item = json!({"name": "Kolo", "description": "Roasted barley", "category": "snacks", "price": 40});

    let response = app
        .send(with_json(
            json_request("POST", "/api/admin/menu").header(header::COOKIE, &cookie),
            &item,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let message = body_json(response).await["message"].as_str().unwrap().to_owned();
    assert!(message.contains("got 'snacks'"));
    app.assert_store_untouched();
}

#[tokio::test]
async fn test_create_menu_item_rejects_malformed_json() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let response = app
        .send(
            Request::post("/api/admin/menu")
                .header(header::COOKIE, &cookie)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    app.assert_store_untouched();
}

#[tokio::test]
async fn test_non_integer_menu_id_is_not_found() {
    let app = TestApp::new();
    let cookie = app.login().await;
    let patch = json!({"price": 10});

    let response = app
        .send(with_json(
            json_request("PUT", "/api/admin/menu/abc").header(header::COOKIE, &cookie),
            &patch,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Menu item not found");

    let response = app
        .send(
            Request::delete("/api/admin/menu/99999999999")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    app.assert_store_untouched();
}

// =============================================================================
// Contact form
// =============================================================================

#[tokio::test]
async fn test_contact_validation_errors() {
    let app = TestApp::new();
    let message = "I would like to book a table for six.";

    let cases = [
        (
            json!({"name": "A", "email": "a@b.c", "message": message}),
            "name must be at least 2 characters",
        ),
        (
            json!({"name": "a".repeat(81), "email": "a@b.c", "message": message}),
            "name must be at most 80 characters",
        ),
        (
            json!({"name": "Abebe 2", "email": "a@b.c", "message": message}),
            "name cannot contain numbers",
        ),
        (
            json!({"name": "Abebe", "email": "not-an-email", "message": message}),
            "email must contain an @ symbol",
        ),
        (
            json!({"name": "Abebe", "email": "a@b.c", "message": "Hi"}),
            "message must be at least 10 characters",
        ),
    ];

    for (i, (body, expected)) in cases.iter().enumerate() {
        let response = contact(&app, &format!("198.51.100.{i}"), body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{expected}");
        assert_eq!(body_json(response).await["message"], *expected);
    }

    app.assert_store_untouched();
}

#[tokio::test]
async fn test_contact_missing_fields_count_as_empty() {
    let app = TestApp::new();
    let response = contact(&app, "198.51.100.50", &json!({})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "name must be at least 2 characters"
    );
}

#[tokio::test]
async fn test_contact_is_rate_limited_per_ip() {
    let app = TestApp::new();
    let body = json!({"name": "A"});

    for _ in 0..5 {
        let response = contact(&app, "203.0.113.9", &body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let response = contact(&app, "203.0.113.9", &body).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(body_json(response).await["message"].is_string());

    // Another client is unaffected
    let response = contact(&app, "203.0.113.10", &body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Upload
// =============================================================================

#[tokio::test]
async fn test_upload_stores_image() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let response = app
        .send(multipart_request(
            &cookie,
            multipart_body("image", "image/png", PNG),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let url = body_json(response).await["url"].as_str().unwrap().to_owned();
    assert!(url.starts_with("/uploads/") && url.ends_with(".png"));

    // Served back from /uploads
    let response = app.send(Request::get(url.as_str()).body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], PNG);
}

#[tokio::test]
async fn test_upload_rejects_bad_files() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let cases = [
        multipart_body("image", "text/plain", b"just some text"),
        multipart_body("photo", "image/png", PNG),
        multipart_body("image", "image/png", b""),
        multipart_body("image", "image/png", &[0x89; 4096]),
    ];

    for body in cases {
        let response = app.send(multipart_request(&cookie, body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["message"].is_string());
    }
}

#[tokio::test]
async fn test_upload_requires_multipart() {
    let app = TestApp::new();
    let cookie = app.login().await;
    let body = json!({"image": "data"});

    let response = app
        .send(with_json(
            json_request("POST", "/api/admin/upload").header(header::COOKIE, &cookie),
            &body,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
