//! Gemini HTTP backend
//!
//! Calls the Generative Language API `generateContent` method with the
//! prompt and every image inlined as base64. One request per call, no
//! retries: a failed call is the estimator's problem to absorb.

use crate::ai::backend::VisionBackend;
use crate::payload::ImagePayload;
use async_trait::async_trait;
use haulquote_types::{BackendError, ConfigError, Error, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default Generative Language API root
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default env var holding the API key
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Gemini backend.
///
/// Built once at startup and shared by both estimator clients.
#[derive(Clone)]
pub struct GeminiBackend {
    client: Client,
    base_url: String,
    api_key: String,
    connect_timeout: Duration,
}

impl std::fmt::Debug for GeminiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiBackend")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiBackend {
    /// Create a backend with an explicit API key
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Misconfiguration` if the HTTP client cannot be constructed
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        connect_timeout: Duration,
    ) -> std::result::Result<Self, BackendError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .use_rustls_tls()
            .build()
            .map_err(|e| {
                BackendError::Misconfiguration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key,
            connect_timeout,
        })
    }

    /// Create a backend reading the API key from `api_key_env`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingCredentials` if the variable is unset or empty
    pub fn from_env(
        api_key_env: &str,
        base_url: Option<String>,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let api_key = std::env::var(api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingCredentials(api_key_env.to_string()))?;

        Self::new(api_key, base_url, connect_timeout).map_err(Error::from)
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    fn build_request(prompt: &str, images: &[ImagePayload]) -> GenerateRequest {
        let mut parts = Vec::with_capacity(images.len() + 1);
        parts.push(Part::Text {
            text: prompt.to_string(),
        });
        for image in images {
            parts.push(Part::InlineData {
                inline_data: InlineData {
                    mime_type: image.mime_type.clone(),
                    data: image.to_base64(),
                },
            });
        }

        GenerateRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts,
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                temperature: 0.1,
            },
        }
    }
}

#[async_trait]
impl VisionBackend for GeminiBackend {
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        images: &[ImagePayload],
    ) -> std::result::Result<String, BackendError> {
        debug!(
            provider = "gemini",
            model = %model,
            images = images.len(),
            "Invoking Gemini backend"
        );

        let request_body = Self::build_request(prompt, images);

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| map_send_error(&e, self.connect_timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_status_error(status, model));
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            BackendError::Transport(format!("Failed to parse Gemini response: {}", e))
        })?;

        let text = body.text();
        if text.trim().is_empty() {
            return Err(BackendError::EmptyResponse(model.to_string()));
        }

        debug!(provider = "gemini", model = %model, chars = text.len(), "Gemini invocation completed");
        Ok(text)
    }
}

/// Only the connect phase has a timeout; anything else is transport.
fn map_send_error(e: &reqwest::Error, connect_timeout: Duration) -> BackendError {
    if e.is_connect() && e.is_timeout() {
        BackendError::ConnectTimeout(connect_timeout)
    } else {
        BackendError::Transport(format!("gemini request failed: {}", e))
    }
}

/// Map a non-success HTTP status to a backend error
fn map_status_error(status: StatusCode, model: &str) -> BackendError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            BackendError::ProviderAuth(format!("gemini/{} rejected credentials: {}", model, status))
        }
        StatusCode::TOO_MANY_REQUESTS => {
            BackendError::ProviderQuota(format!("gemini/{} rate limited: {}", model, status))
        }
        s if s.is_server_error() => {
            BackendError::ProviderOutage(format!("gemini/{} returned server error: {}", model, s))
        }
        s => BackendError::Transport(format!("gemini/{} returned {}", model, s)),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| match part {
                        Part::Text { text } => Some(text.as_str()),
                        Part::InlineData { .. } => None,
                    })
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}
