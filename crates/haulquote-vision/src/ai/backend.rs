//! Backend abstraction for image-understanding services

use crate::payload::ImagePayload;
use async_trait::async_trait;
use haulquote_types::BackendError;

/// A service that answers a text prompt about a set of images.
///
/// Implementations perform one outbound call per `generate` and no retries.
#[async_trait]
pub trait VisionBackend: Send + Sync {
    /// Send `prompt` and `images` to `model` and return the raw text answer.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` for transport, auth, quota and outage failures
    /// and for answers without text content.
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        images: &[ImagePayload],
    ) -> Result<String, BackendError>;
}
