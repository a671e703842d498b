//! Response Content-Type stamping for the API routes.

use axum::extract::Request;
use axum::http::{header, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;

/// Stamp every response that passes through as JSON.
///
/// Handlers and the error envelope both emit raw bodies; the header is
/// applied here in one place rather than per handler.
pub async fn json_content_type(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=utf-8"),
    );
    response
}
