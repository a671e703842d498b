//! HTTP middleware for the workhub gateway.

pub mod basic_auth;
pub mod content_type;

pub use basic_auth::{authorize, require_admin, AdminCredential, AuthError};
pub use content_type::json_content_type;
