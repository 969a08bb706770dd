//! Per-request correlation ids.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// Header carrying the correlation id, in both directions.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_REQUEST_ID_LENGTH: usize = 128;

/// Id forwarded by a proxy in front of us, if it is safe to log and echo.
///
/// Accepts 1 to 128 visible ASCII characters.
fn forwarded_id(headers: &HeaderMap) -> Option<&str> {
    let id = headers.get(REQUEST_ID_HEADER)?.to_str().ok()?;
    let usable = (1..=MAX_REQUEST_ID_LENGTH).contains(&id.len())
        && id.bytes().all(|b| b.is_ascii_graphic());
    usable.then_some(id)
}

/// Tags the request with a correlation id and echoes it on the response.
///
/// The id lands on the `request_id` field of the trace span opened in
/// `routes::with_middleware` and on the Sentry scope, so log lines and error
/// reports for one request can be matched up.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let id = forwarded_id(request.headers())
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_owned);

    Span::current().record("request_id", id.as_str());
    sentry::configure_scope(|scope| scope.set_tag("request_id", &id));

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
