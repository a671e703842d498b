//! HTTP client for communicating with the workhub gateway.
//!
//! The gateway answers with bare JSON payloads on success, a
//! `{"error": "..."}` envelope with status 500 on application failures, and
//! plain text with status 401 on auth failures; all three shapes are folded
//! into `anyhow` errors here.

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the workhub gateway.
pub struct ApiClient {
    client: Client,
    base_url: String,
    username: Option<String>,
    password: Option<String>,
}

impl ApiClient {
    /// Create a new API client pointing at the given base URL.
    pub fn new(base_url: &str, username: Option<String>, password: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            username,
            password,
        })
    }

    /// Return the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn with_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.username {
            Some(username) => request.basic_auth(username, self.password.as_deref()),
            None => request,
        }
    }

    /// Perform a GET request and deserialize the response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .with_auth(self.client.get(&url))
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?;

        Self::decode(resp, &url).await
    }

    /// Perform a bodyless POST request and deserialize the response.
    pub async fn post<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .with_auth(self.client.post(&url))
            .send()
            .await
            .with_context(|| format!("POST {} failed", url))?;

        Self::decode(resp, &url).await
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response, url: &str) -> Result<T> {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();

        if !status.is_success() {
            if let Ok(envelope) = serde_json::from_str::<ErrorBody>(&body) {
                anyhow::bail!("API error ({}): {}", status, envelope.error);
            }
            anyhow::bail!("API error ({}): {}", status, body.trim());
        }

        serde_json::from_str(&body).with_context(|| format!("Failed to parse response from {}", url))
    }
}
