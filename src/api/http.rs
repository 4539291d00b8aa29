//! HTTP transport for the catalog API
//!
//! Thin wrapper over `reqwest` that turns every outcome into either a decoded
//! body or an [`ApiError`]. Reads take a cancellation token and race it
//! against the request.

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{multipart, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Default request timeout, applied by the transport only
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Failure of a single request
#[derive(Error, Debug)]
pub enum ApiError {
    /// The caller's token fired before the request settled
    #[error("Request cancelled")]
    Cancelled,

    /// The server answered with a non-success status
    #[error("Request rejected (HTTP {status})")]
    Rejected { status: u16, body: Option<Value> },

    /// No response: connect failure, timeout, broken body stream
    #[error("{0}")]
    Transport(String),

    /// Success status with a body that could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// HTTP status, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Error body sent by the server, if any
    pub fn body(&self) -> Option<&Value> {
        match self {
            ApiError::Rejected { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

/// Shared HTTP client bound to one API base URL
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpClient {
    /// Create a client with the default timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom timeout
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a JSON body, abandoning the request as soon as `cancel` fires
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        cancel: &CancellationToken,
    ) -> Result<T, ApiError> {
        let request = self
            .client
            .get(self.url(path))
            .header(ACCEPT, "application/json");

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ApiError::Cancelled),
            result = execute(request) => result,
        }
    }

    /// POST a JSON body and decode the JSON answer
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self
            .client
            .post(self.url(path))
            .header(ACCEPT, "application/json")
            .json(body);
        execute(request).await
    }

    /// POST a multipart form and decode the JSON answer
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: multipart::Form,
    ) -> Result<T, ApiError> {
        let request = self
            .client
            .post(self.url(path))
            .header(ACCEPT, "application/json")
            .multipart(form);
        execute(request).await
    }
}

async fn execute<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(ApiError::Rejected {
            status: status.as_u16(),
            body: parse_body(&text),
        });
    }

    serde_json::from_str(&text)
        .map_err(|e| ApiError::InvalidResponse(format!("JSON parse error: {}", e)))
}

/// Keep an error body as JSON; non-JSON text becomes a JSON string
fn parse_body(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())))
}
