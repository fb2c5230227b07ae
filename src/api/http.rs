//! reqwest-backed [`Transport`].

use std::time::Duration;

use tracing::debug;

use super::auth::TokenSlot;
use super::{ApiRequest, ApiResponse, Method, Transport};
use crate::error::TransportError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    token: TokenSlot,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, token: TokenSlot) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Same as [`HttpTransport::new`] with a per-request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        token: TokenSlot,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.url(&request.path);
        let mut builder = match request.method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
            Method::Put => self.http.put(&url),
            Method::Delete => self.http.delete(&url),
        };
        if let Some(token) = self.token.get() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!(method = request.method.as_str(), %url, "sending request");
        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let text = resp.text().await?;
        // Non-JSON bodies (HTML error pages, empty 204s) carry no envelope.
        let body = if text.trim().is_empty() { None } else { serde_json::from_str(&text).ok() };
        debug!(method = request.method.as_str(), %url, status, "received response");
        Ok(ApiResponse::new(status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let t = HttpTransport::new("http://localhost:3000/api/", TokenSlot::default());
        assert_eq!(t.base_url(), "http://localhost:3000/api");
        assert_eq!(t.url("/admins/"), "http://localhost:3000/api/admins/");
    }
}
