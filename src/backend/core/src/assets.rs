//! Embedded dashboard assets.
//!
//! The page and its script are compiled into the binary and served as-is.
//! Both routes sit outside the auth gate; the API calls the page makes are
//! themselves gated, so the browser prompts for credentials on first fetch.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

const INDEX_HTML: &str = include_str!("../assets/index.html");
const WORK_JS: &str = include_str!("../assets/work.js");

/// GET / - the dashboard page.
pub async fn index() -> Response {
    with_content_type(INDEX_HTML, "text/html; charset=utf-8")
}

/// GET /work.js - the dashboard script.
pub async fn work_js() -> Response {
    with_content_type(WORK_JS, "application/javascript; charset=utf-8")
}

fn with_content_type(body: &'static str, content_type: &'static str) -> Response {
    let mut response = (StatusCode::OK, body).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(content_type),
    );
    response
}
