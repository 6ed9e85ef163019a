//! Shared HTTP client for the gate backend.

use std::time::Duration;

use gate_core::{GateConfig, StoreError, UserRecord, VerifyError};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::types::ErrorBody;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Request timed out")]
    Timeout,
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl From<ApiError> for VerifyError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Connection(msg) => VerifyError::Connection(msg),
            ApiError::Timeout => VerifyError::Timeout,
            ApiError::Status { status, .. } => VerifyError::Server { status },
            ApiError::Parse(msg) => VerifyError::Malformed(msg),
            ApiError::Http(e) => VerifyError::Connection(e.to_string()),
        }
    }
}

impl From<ApiError> for StoreError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status { status, message } if status < 500 => StoreError::Rejected(message),
            ApiError::Parse(msg) => StoreError::Malformed(msg),
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}

/// Backend client shared by the verification and directory adapters.
#[derive(Clone)]
pub struct GateHttpClient {
    client: Client,
    base_url: String,
}

impl GateHttpClient {
    /// Create a client for `base_url`.
    pub fn new(
        base_url: impl Into<String>,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(ApiError::Http)?;

        let base_url: String = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from gate configuration.
    pub fn from_config(config: &GateConfig) -> Result<Self, ApiError> {
        Self::new(
            config.api_base_url.clone(),
            config.request_timeout(),
            config.connect_timeout(),
        )
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path or server-relative asset path.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// URL of the printable QR image for `user`.
    pub fn qr_image_url(&self, user: &UserRecord) -> String {
        self.url(&user.qr_image_path())
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    /// Map a send failure to connection/timeout categories.
    pub(crate) fn send_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_connect() {
            ApiError::Connection(format!("Cannot connect to {}", self.base_url))
        } else {
            ApiError::Http(e)
        }
    }

    /// Read a JSON body regardless of status.
    pub(crate) async fn read_json<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<(StatusCode, T), ApiError> {
        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.send_error(e))?;
        let parsed = serde_json::from_slice(&body).map_err(|e| ApiError::Parse(e.to_string()))?;
        Ok((status, parsed))
    }

    /// Fail on non-2xx, extracting `{"error": ...}` when present.
    pub(crate) async fn ensure_success(&self, response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let message = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}
