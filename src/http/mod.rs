use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_core::Stream;
use serde::Serialize;

use crate::error::ClientError;

/// HTTP methods understood by the lightweight transport abstraction.
///
/// Only the verbs this crate actually issues are modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Minimal HTTP request representation handed to a transport.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Vec<u8>>,
    /// Per-request deadline; the transport maps its expiry to
    /// [`ClientError::Timeout`].
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Builds a POST request with a JSON request body.
    ///
    /// The helper sets the `Content-Type` header to `application/json` and
    /// stores the provided buffer as the body.
    ///
    /// # Examples
    ///
    /// ```
    /// use shinkai_llm::http::{HttpMethod, HttpRequest};
    ///
    /// let request = HttpRequest::post_json("https://example.com", br"{}".to_vec());
    /// assert_eq!(request.method, HttpMethod::Post);
    /// assert_eq!(request.headers.get("Content-Type"), Some(&"application/json".to_string()));
    /// ```
    pub fn post_json(url: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers: HashMap::from([("Content-Type".to_string(), "application/json".to_string())]),
            body: Some(body),
            timeout: None,
        }
    }

    /// Builds a bodyless GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
            timeout: None,
        }
    }

    /// Overrides the request headers after construction.
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// Attaches a per-request deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Minimal HTTP response representation.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Converts the body into a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Malformed`] when the body cannot be interpreted
    /// as UTF-8.
    pub fn into_string(self) -> Result<String, ClientError> {
        String::from_utf8(self.body).map_err(|err| ClientError::malformed(err.to_string()))
    }
}

/// HTTP response that carries a streaming body.
pub struct HttpStreamResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: HttpBodyStream,
}

/// Alias for the body stream returned by [`HttpTransport::send_stream`].
pub type HttpBodyStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, ClientError>> + Send>>;

/// Transport abstraction decoupling the provider from the concrete HTTP client.
///
/// Tests substitute in-memory implementations; production code uses
/// [`reqwest::ReqwestTransport`](crate::http::reqwest::ReqwestTransport).
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends a request and resolves when the full response is available.
    ///
    /// # Errors
    ///
    /// Implementations map network failures to [`ClientError::Transport`] and
    /// elapsed deadlines to [`ClientError::Timeout`].
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError>;

    /// Sends a request and returns a streaming body.
    ///
    /// # Errors
    ///
    /// Same mapping as [`HttpTransport::send`]; errors surfaced mid-body arrive
    /// as items of the returned stream instead.
    async fn send_stream(&self, request: HttpRequest) -> Result<HttpStreamResponse, ClientError>;
}

/// Thread-safe handle to a transport implementation.
pub type DynHttpTransport = Arc<dyn HttpTransport>;

/// Serializes a body to JSON, attaches headers, and issues a POST request.
///
/// # Errors
///
/// Returns [`ClientError::Validation`] if serialization fails or forwards the
/// error raised by [`HttpTransport::send`].
pub async fn post_json_with_headers<T: Serialize>(
    transport: &dyn HttpTransport,
    url: impl Into<String>,
    headers: HashMap<String, String>,
    timeout: Option<Duration>,
    body: &T,
) -> Result<HttpResponse, ClientError> {
    let payload = serde_json::to_vec(body)
        .map_err(|err| ClientError::validation(format!("failed to serialize request: {err}")))?;
    let mut request = HttpRequest::post_json(url, payload).with_headers(headers);
    request.timeout = timeout;
    transport.send(request).await
}

/// Issues a JSON POST request and returns the streaming response.
///
/// The helper mirrors [`post_json_with_headers`] but calls
/// [`HttpTransport::send_stream`] to support Server-Sent Events.
///
/// # Errors
///
/// Returns [`ClientError::Validation`] when serialization fails or propagates
/// any error from [`HttpTransport::send_stream`].
pub async fn post_json_stream_with_headers<T: Serialize>(
    transport: &dyn HttpTransport,
    url: impl Into<String>,
    headers: HashMap<String, String>,
    timeout: Option<Duration>,
    body: &T,
) -> Result<HttpStreamResponse, ClientError> {
    let payload = serde_json::to_vec(body)
        .map_err(|err| ClientError::validation(format!("failed to serialize request: {err}")))?;
    let mut request = HttpRequest::post_json(url, payload).with_headers(headers);
    request.timeout = timeout;
    transport.send_stream(request).await
}

pub mod reqwest;
