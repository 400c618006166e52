//! Custom error types for release propagation.

use std::time::Duration;
use thiserror::Error;

/// Main error type for release propagation operations.
#[derive(Error, Debug)]
pub enum PropagatorError {
    // Cli args / configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Webhook payload errors
    #[error("Invalid release event: {0}")]
    InvalidEvent(String),

    // Forge errors
    #[error("Unexpected response from {endpoint}: status {status}: {body}")]
    UnexpectedResponse {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("No tag ref found for released version {0}")]
    TagNotFound(String),

    #[error("No head ref found for default branch '{0}'")]
    MissingHead(String),

    #[error("Unsupported content encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("Repository update timed out after {0:?}")]
    Timeout(Duration),

    // Network/API errors
    #[error("Network request failed: {0}")]
    NetworkError(String),

    #[error("API authentication failed: {0}")]
    AuthenticationError(String),

    // Version/parsing errors - automatic conversions via #[from]
    #[error("Invalid version format: {0}")]
    InvalidVersion(#[from] semver::Error),

    #[error("JSON parse error: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("Regular expression error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Base64 decode error: {0}")]
    Base64DecodeError(#[from] base64::DecodeError),

    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),
}

impl PropagatorError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an invalid event error
    pub fn invalid_event(msg: impl Into<String>) -> Self {
        Self::InvalidEvent(msg.into())
    }

    /// Create an unexpected response error for an endpoint
    pub fn unexpected(
        endpoint: impl Into<String>,
        status: u16,
        body: impl Into<String>,
    ) -> Self {
        Self::UnexpectedResponse {
            endpoint: endpoint.into(),
            status,
            body: body.into(),
        }
    }
}

// Implement From for reqwest errors (network/API)
impl From<reqwest::Error> for PropagatorError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) if status.as_u16() == 401 || status.as_u16() == 403 => {
                Self::AuthenticationError(err.to_string())
            }
            _ => Self::NetworkError(err.to_string()),
        }
    }
}
