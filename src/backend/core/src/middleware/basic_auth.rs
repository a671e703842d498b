//! HTTP Basic authentication against a single configured operator identity.
//!
//! Every API request passes through [`require_admin`]; static dashboard
//! assets are mounted outside it. Auth failures answer 401 with a plain-text
//! body and never the JSON envelope, and the `WWW-Authenticate` challenge is
//! attached to every response that crosses the gate, successful ones
//! included — long-standing dashboard behavior that clients have come to
//! rely on.
//!
//! The default acceptance rule is the historical one: a request is refused
//! only when the presented username AND password are both wrong, so one
//! correct field is enough to get in. `AdminCredential::strict` switches to
//! requiring both fields to match.

use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::Engine;
use thiserror::Error;

/// The operator identity every API request must present.
#[derive(Debug, Clone)]
pub struct AdminCredential {
    pub username: String,
    pub password: String,
    /// Require both fields to match instead of the legacy either-field rule.
    pub strict: bool,
}

impl AdminCredential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            strict: false,
        }
    }

    /// Require both username and password to match.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }
}

/// Authentication errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Missing, malformed, or rejected credentials.
    #[error("Not authorized")]
    NotAuthorized,

    /// The credential token failed to decode; carries the decoder's message.
    #[error("{0}")]
    MalformedToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // Plain-text body; the JSON content-type stamp sits inside the gate
        // and never touches these responses.
        (StatusCode::UNAUTHORIZED, self.to_string()).into_response()
    }
}

/// Validate an `Authorization` header value against the configured
/// credential.
pub fn authorize(header_value: Option<&str>, credential: &AdminCredential) -> Result<(), AuthError> {
    let header_value = header_value.unwrap_or("");

    let mut parts = header_value.splitn(2, ' ');
    let token = match (parts.next(), parts.next()) {
        (Some(_scheme), Some(token)) => token,
        _ => return Err(AuthError::NotAuthorized),
    };

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(token)
        .map_err(|err| AuthError::MalformedToken(err.to_string()))?;
    let decoded =
        String::from_utf8(decoded).map_err(|err| AuthError::MalformedToken(err.to_string()))?;

    let mut pair = decoded.splitn(2, ':');
    let (username, password) = match (pair.next(), pair.next()) {
        (Some(username), Some(password)) => (username, password),
        _ => return Err(AuthError::NotAuthorized),
    };

    let username_ok = username == credential.username;
    let password_ok = password == credential.password;
    let granted = if credential.strict {
        username_ok && password_ok
    } else {
        // Legacy rule: refuse only when both fields are wrong.
        username_ok || password_ok
    };

    if granted {
        Ok(())
    } else {
        Err(AuthError::NotAuthorized)
    }
}

/// Request interceptor gating the API routes behind [`authorize`].
pub async fn require_admin(
    State(credential): State<AdminCredential>,
    request: Request,
    next: Next,
) -> Response {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let mut response = match authorize(header_value, &credential) {
        Ok(()) => next.run(request).await,
        Err(err) => {
            tracing::debug!(error = %err, "request rejected at the auth gate");
            err.into_response()
        }
    };

    response.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static(r#"Basic realm="Restricted""#),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential() -> AdminCredential {
        AdminCredential::new("admin", "secret")
    }

    fn basic(username: &str, password: &str) -> String {
        let token = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", username, password));
        format!("Basic {}", token)
    }

    #[test]
    fn matching_credentials_pass() {
        assert!(authorize(Some(&basic("admin", "secret")), &credential()).is_ok());
    }

    #[test]
    fn single_field_match_passes_under_legacy_rule() {
        // Correct username, wrong password.
        assert!(authorize(Some(&basic("admin", "wrong")), &credential()).is_ok());
        // Wrong username, correct password.
        assert!(authorize(Some(&basic("wrong", "secret")), &credential()).is_ok());
    }

    #[test]
    fn double_mismatch_is_rejected() {
        assert_eq!(
            authorize(Some(&basic("wrong", "wrong")), &credential()),
            Err(AuthError::NotAuthorized)
        );
    }

    #[test]
    fn strict_mode_requires_both_fields() {
        let strict = credential().strict();
        assert!(authorize(Some(&basic("admin", "secret")), &strict).is_ok());
        assert_eq!(
            authorize(Some(&basic("admin", "wrong")), &strict),
            Err(AuthError::NotAuthorized)
        );
        assert_eq!(
            authorize(Some(&basic("wrong", "secret")), &strict),
            Err(AuthError::NotAuthorized)
        );
    }

    #[test]
    fn missing_header_is_rejected() {
        assert_eq!(
            authorize(None, &credential()),
            Err(AuthError::NotAuthorized)
        );
        assert_eq!(
            authorize(Some(""), &credential()),
            Err(AuthError::NotAuthorized)
        );
    }

    #[test]
    fn header_without_token_is_rejected() {
        assert_eq!(
            authorize(Some("Basic"), &credential()),
            Err(AuthError::NotAuthorized)
        );
    }

    #[test]
    fn invalid_base64_reports_the_decode_error() {
        let err = authorize(Some("Basic %%%"), &credential()).unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken(_)));
    }

    #[test]
    fn token_without_colon_is_rejected() {
        let token = base64::engine::general_purpose::STANDARD.encode("admin-secret");
        assert_eq!(
            authorize(Some(&format!("Basic {}", token)), &credential()),
            Err(AuthError::NotAuthorized)
        );
    }

    #[test]
    fn password_may_contain_colons() {
        // Only the first colon separates the pair.
        let cred = AdminCredential::new("admin", "se:cr:et").strict();
        assert!(authorize(Some(&basic("admin", "se:cr:et")), &cred).is_ok());
    }
}
