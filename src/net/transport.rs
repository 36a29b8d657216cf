//! HTTP request/response types and the transport seam.
//!
//! ERROR HANDLING
//! ==============
//! A transport only fails when no response arrived (connect, DNS, timeout).
//! Every status code, 401 included, is a successful transport result that
//! the caller interprets.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::platform::HttpCookieJar;

// =============================================================================
// REQUEST
// =============================================================================

/// Whether session cookies accompany the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Credentials {
    #[default]
    Include,
    Omit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Json(serde_json::Value),
    /// `application/x-www-form-urlencoded` fields, in order.
    Form(Vec<(String, String)>),
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the configured base URL, e.g. `/api/users/me`.
    pub path: String,
    /// Unencoded query pairs; the transport encodes them.
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: Body,
    pub credentials: Credentials,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: Body::Empty,
            credentials: Credentials::default(),
        }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    #[must_use]
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Body::Json(body);
        self
    }

    #[must_use]
    pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = Body::Form(fields);
        self
    }

    #[must_use]
    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_owned(), value.to_owned()));
        self
    }

    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }
}

// =============================================================================
// RESPONSE
// =============================================================================

/// A fully read response. Header lookups are case-insensitive.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl ApiResponse {
    #[must_use]
    pub fn new(status: u16, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self { status, headers, body }
    }

    /// Response with a JSON body and no headers.
    #[must_use]
    pub fn with_json(status: u16, body: &serde_json::Value) -> Self {
        Self::new(status, HeaderMap::new(), body.to_string().into_bytes())
    }

    #[must_use]
    pub fn empty(status: u16) -> Self {
        Self::new(status, HeaderMap::new(), Vec::new())
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Decode the body as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MalformedResponse`] if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        serde_json::from_slice(&self.body).map_err(|e| ClientError::MalformedResponse(e.to_string()))
    }

    /// The body's `error` field when present and non-empty.
    #[must_use]
    pub fn server_error(&self) -> Option<String> {
        serde_json::from_slice::<ErrorBody>(&self.body)
            .ok()
            .and_then(|body| body.error)
            .filter(|message| !message.trim().is_empty())
    }

    /// [`ApiResponse::server_error`], falling back to `default`.
    #[must_use]
    pub fn error_message(&self, default: &str) -> String {
        self.server_error().unwrap_or_else(|| default.to_owned())
    }
}

// =============================================================================
// TRANSPORT
// =============================================================================

#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Issue `request` and read the full response.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] when no response was received.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError>;
}

/// `reqwest`-backed transport.
///
/// Holds two clients sharing one configuration: one carries the cookie jar
/// (for [`Credentials::Include`]) and one never sends or stores cookies.
pub struct HttpTransport {
    with_cookies: reqwest::Client,
    without_cookies: reqwest::Client,
    jar: HttpCookieJar,
    config: ClientConfig,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the base URL is invalid or the
    /// HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let origin = Url::parse(&config.base_url).map_err(|e| ClientError::Config(e.to_string()))?;
        let jar = Arc::new(reqwest::cookie::Jar::default());
        let request_timeout = Duration::from_secs(config.timeouts.request_secs);
        let connect_timeout = Duration::from_secs(config.timeouts.connect_secs);

        let with_cookies = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("HTTP client build failed: {e}")))?;
        let without_cookies = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("HTTP client build failed: {e}")))?;

        Ok(Self { with_cookies, without_cookies, jar: HttpCookieJar::new(jar, origin), config: config.clone() })
    }

    /// Handle on the cookie store this transport sends with.
    #[must_use]
    pub fn cookie_jar(&self) -> HttpCookieJar {
        self.jar.clone()
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let client = match request.credentials {
            Credentials::Include => &self.with_cookies,
            Credentials::Omit => &self.without_cookies,
        };
        let url = self.config.endpoint(&request.path);

        let mut builder = client
            .request(request.method, url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .headers(request.headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = match request.body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(&value),
            Body::Form(fields) => builder.form(&fields),
        };

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(transport_error)?;
        Ok(ApiResponse::new(status, headers, body.to_vec()))
    }
}

fn transport_error(error: reqwest::Error) -> ClientError {
    if error.is_timeout() {
        ClientError::Transport(format!("request timed out: {error}"))
    } else {
        ClientError::Transport(error.to_string())
    }
}
