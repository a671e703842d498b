//! Serialization of successful payloads.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::Result;

/// Serialize a payload as tab-indented JSON.
///
/// The dashboard has always consumed tab-indented output; keep the format
/// stable. A serialization failure converts into the standard error envelope
/// at the call site.
pub fn render<T: Serialize>(value: &T) -> Result<Response> {
    let mut buf = Vec::with_capacity(256);
    let formatter = PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;

    Ok((StatusCode::OK, buf).into_response())
}
