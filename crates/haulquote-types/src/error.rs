//! Error types for haulquote

use std::time::Duration;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error("Missing credentials: environment variable '{0}' is not set")]
    MissingCredentials(String),

    #[error("Missing setting '{0}': pass it on the command line or set it with `haulquote config`")]
    MissingSetting(&'static str),
}

/// Failure of a single vision backend call.
///
/// Never crosses the estimator boundary: the estimator turns every variant
/// into an unusable measurement.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Backend misconfigured: {0}")]
    Misconfiguration(String),

    #[error("Authentication failed: {0}")]
    ProviderAuth(String),

    #[error("Quota exceeded: {0}")]
    ProviderQuota(String),

    #[error("Provider outage: {0}")]
    ProviderOutage(String),

    #[error("Connection not established within {0:?}")]
    ConnectTimeout(Duration),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Backend returned no text content: {0}")]
    EmptyResponse(String),
}

/// Inbound request validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Request contains no images")]
    EmptyImageList,

    #[error("Request contains {count} images (maximum is {max})")]
    TooManyImages { count: usize, max: usize },

    #[error("Image {index} is invalid: {reason}")]
    InvalidImage { index: usize, reason: String },

    #[error("Malformed request body: {0}")]
    MalformedBody(String),
}

/// Reverse-proxy errors
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Upstream did not answer within {0:?}")]
    DeadlineExceeded(Duration),

    #[error("Upstream transport error: {0}")]
    Transport(String),

    #[error("Upstream returned an unreadable body (HTTP {status}): {message}")]
    InvalidBody { status: u16, message: String },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Invalid request: {0}")]
    Request(#[from] RequestError),

    #[error("Proxy error: {0}")]
    Proxy(#[from] ProxyError),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
