//! REST plumbing: the [`Transport`] seam, request/response values and the
//! `{success, data, message}` envelope every endpoint answers with.
//!
//! Stores only talk to `dyn Transport`, so the HTTP implementation in
//! [`http`] can be swapped for a scripted one in tests.
pub mod auth;
pub mod http;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::TransportError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// A request relative to the API base URL. `path` always starts with `/`.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self { method: Method::Get, path: path.into(), body: None }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self { method: Method::Post, path: path.into(), body: Some(body) }
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self { method: Method::Put, path: path.into(), body: Some(body) }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self { method: Method::Delete, path: path.into(), body: None }
    }
}

/// Raw answer from the server: status plus the JSON body, if it had one.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl ApiResponse {
    pub fn new(status: u16, body: Option<Value>) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Best-effort `message` field of the body; empty strings count as absent.
    pub fn message(&self) -> Option<String> {
        self.body
            .as_ref()
            .and_then(|b| b.get("message"))
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    }

    /// Decode the body as an [`Envelope`].
    pub fn envelope<T: DeserializeOwned>(&self) -> Result<Envelope<T>, TransportError> {
        let body = self
            .body
            .clone()
            .ok_or_else(|| TransportError::Decode(format!("empty body (HTTP {})", self.status)))?;
        serde_json::from_value(body).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

/// The JSON wrapper shared by all endpoints.
#[derive(Clone, Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    /// Only present on `/count` endpoints; kept raw so non-numbers can be rejected.
    #[serde(default)]
    pub count: Option<Value>,
}

impl<T> Envelope<T> {
    /// Server message, or `fallback` when it is missing or empty.
    pub fn message_or(&self, fallback: &str) -> String {
        match self.message.as_deref() {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => fallback.to_string(),
        }
    }
}

/// Sends [`ApiRequest`]s to the backend.
///
/// Implementations return `Ok` for every HTTP answer, including error
/// statuses; `Err` means no response was obtained at all.
#[async_trait::async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_ignores_empty_strings() {
        let resp = ApiResponse::new(500, Some(json!({ "message": "" })));
        assert_eq!(resp.message(), None);
        let resp = ApiResponse::new(404, Some(json!({ "message": "gone" })));
        assert_eq!(resp.message().as_deref(), Some("gone"));
    }

    #[test]
    fn envelope_tolerates_missing_data() {
        let resp = ApiResponse::new(200, Some(json!({ "success": false, "message": "DB down" })));
        let env: Envelope<Vec<Value>> = resp.envelope().unwrap();
        assert!(!env.success);
        assert!(env.data.is_none());
        assert_eq!(env.message_or("fallback"), "DB down");
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Ticket {
        code: u32,
    }

    fn decode<T: DeserializeOwned>(body: Value) -> Option<T> {
        ApiResponse::new(200, Some(body)).envelope::<T>().ok()?.data
    }

    #[test]
    fn envelope_data_needs_no_default() {
        assert_eq!(decode::<Ticket>(json!({ "success": true, "data": { "code": 7 } })), Some(Ticket { code: 7 }));
        assert_eq!(decode::<Ticket>(json!({ "success": true })), None);
    }

    #[test]
    fn envelope_without_body_is_a_decode_error() {
        let resp = ApiResponse::new(204, None);
        let err = resp.envelope::<Value>().unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));
    }
}
