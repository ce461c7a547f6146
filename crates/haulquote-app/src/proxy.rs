//! Reverse proxy to a remote estimate endpoint
//!
//! Forwards an estimate body upstream under one overall deadline. A 5xx
//! answer is retried once; 2xx and 4xx answers are returned as they are.
//! This retry is separate from the estimator, which never retries.

use haulquote_types::{EstimateResponse, ProxyError};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

/// Default overall deadline (5 minutes)
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(300);

/// Retries allowed after the first attempt, server errors only
pub const MAX_RETRIES: u32 = 1;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Upstream answer
#[derive(Debug, Clone, PartialEq)]
pub struct ProxiedResponse {
    pub status_code: u16,
    pub body: EstimateResponse,
    pub attempts: u32,
}

#[derive(Clone)]
pub struct UpstreamProxy {
    client: Client,
    url: String,
    deadline: Duration,
}

impl UpstreamProxy {
    /// Create a proxy for `url`
    ///
    /// # Errors
    ///
    /// Returns `ProxyError::Transport` if the HTTP client cannot be constructed
    pub fn new(url: impl Into<String>, deadline: Duration) -> Result<Self, ProxyError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .use_rustls_tls()
            .build()
            .map_err(|e| ProxyError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
            deadline,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Forward `body` upstream, retrying once on a server error.
    ///
    /// # Errors
    ///
    /// - `ProxyError::DeadlineExceeded` if the whole exchange, retry included,
    ///   outlives the deadline
    /// - `ProxyError::Transport` for network failures
    /// - `ProxyError::InvalidBody` if the upstream answer is not an estimate response
    pub async fn forward(&self, body: &serde_json::Value) -> Result<ProxiedResponse, ProxyError> {
        tokio::time::timeout(self.deadline, self.forward_with_retry(body))
            .await
            .map_err(|_| ProxyError::DeadlineExceeded(self.deadline))?
    }

    async fn forward_with_retry(
        &self,
        body: &serde_json::Value,
    ) -> Result<ProxiedResponse, ProxyError> {
        let mut attempt = 0;

        loop {
            attempt += 1;

            debug!(url = %self.url, attempt = attempt, "Forwarding estimate upstream");

            let response = self
                .client
                .post(&self.url)
                .json(body)
                .send()
                .await
                .map_err(|e| ProxyError::Transport(format!("{} request failed: {}", self.url, e)))?;

            let status = response.status();

            if should_retry(status, attempt) {
                warn!(
                    url = %self.url,
                    attempt = attempt,
                    status = status.as_u16(),
                    "Upstream server error, will retry"
                );
                continue;
            }

            let text = response
                .text()
                .await
                .map_err(|e| ProxyError::Transport(format!("{} body read failed: {}", self.url, e)))?;

            let body: EstimateResponse =
                serde_json::from_str(&text).map_err(|e| ProxyError::InvalidBody {
                    status: status.as_u16(),
                    message: e.to_string(),
                })?;

            return Ok(ProxiedResponse {
                status_code: status.as_u16(),
                body,
                attempts: attempt,
            });
        }
    }
}

/// Whether attempt number `attempt` (1-based) should be followed by another
pub fn should_retry(status: StatusCode, attempt: u32) -> bool {
    status.is_server_error() && attempt <= MAX_RETRIES
}
