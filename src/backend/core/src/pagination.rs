//! Page-number parsing for the paged job listings.

use serde::Deserialize;

use crate::error::Result;

/// Query parameters accepted by the paged listing endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    /// 1-based page number; absent or empty means the first page.
    #[serde(default)]
    pub page: Option<String>,
}

/// Resolve the requested page, defaulting to 1.
///
/// A `page` value that is present but malformed (non-numeric, negative,
/// overflowing) is an error rather than a silent default; out-of-range but
/// well-formed pages are left for the store to answer with an empty listing.
pub fn parse_page(query: &PageQuery) -> Result<u64> {
    match query.page.as_deref() {
        None | Some("") => Ok(1),
        Some(raw) => Ok(raw.parse::<u64>()?),
    }
}
