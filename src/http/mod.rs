//! HTTP transport shared by every provider backend.
//!
//! Backends never talk to `reqwest` directly. They build an [`HttpRequest`],
//! hand it to a [`Transport`], and decode the reply with [`post`], which maps
//! HTTP status codes onto the provider error taxonomy.

#[cfg(test)]
pub(crate) mod mock;

use crate::error::{Result, VeilederError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Default timeout for requests that don't set their own (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// A JSON POST request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: serde_json::Value,
    /// Per-request timeout, overriding the client default.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn new(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            body,
            timeout: None,
        }
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Raw response: status code and undecoded body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Failure to get any response at all (connect error, timeout, broken body).
#[derive(Debug, Clone)]
pub struct TransportError {
    pub message: String,
    pub timed_out: bool,
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.timed_out {
            write!(f, "request timed out: {}", self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        Self {
            timed_out: e.is_timeout(),
            message: e.to_string(),
        }
    }
}

/// Something that can deliver a JSON POST and return the raw reply.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError>;
}

/// `reqwest`-backed transport.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with the default 5-minute timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a transport with a custom default timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VeilederError::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
        let mut builder = self.client.post(&request.url).json(&request.body);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(HttpResponse { status, body })
    }
}

/// Send `request` and decode a successful JSON body into `T`.
///
/// Status mapping: 401/403 auth, 429 rate limit, 5xx unavailable, any other
/// non-2xx or an undecodable body is a response error.
pub async fn post<T: DeserializeOwned>(
    transport: &dyn Transport,
    provider: &str,
    request: HttpRequest,
) -> Result<T> {
    debug!("POST {} ({})", request.url, provider);

    let response = transport
        .post_json(request)
        .await
        .map_err(|e| VeilederError::unavailable(provider, e.to_string()))?;

    match response.status {
        200..=299 => {}
        401 | 403 => return Err(VeilederError::auth(provider, response.body)),
        429 => return Err(VeilederError::rate_limit(provider, response.body)),
        500..=599 => {
            return Err(VeilederError::unavailable(
                provider,
                format!("HTTP {}: {}", response.status, response.body),
            ))
        }
        status => {
            return Err(VeilederError::response(
                provider,
                format!("HTTP {}: {}", status, response.body),
            ))
        }
    }

    serde_json::from_str(&response.body)
        .map_err(|e| VeilederError::response(provider, format!("failed to decode body: {}", e)))
}
