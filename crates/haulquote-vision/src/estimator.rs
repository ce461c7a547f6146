//! Per-model estimator clients and the two-model fan-out

use crate::ai::backend::VisionBackend;
use crate::ai::prompts::build_measurement_prompt;
use crate::parse::parse_measurement;
use crate::payload::ImagePayload;
use haulquote_types::{Measurement, ModelSlot};
use std::sync::Arc;
use tracing::{debug, warn};

/// Longest slice of a raw answer kept in diagnostics
const RAW_PREVIEW_CHARS: usize = 300;

/// Model names for the two slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRoster {
    pub primary: String,
    pub secondary: String,
}

impl Default for ModelRoster {
    fn default() -> Self {
        Self {
            primary: "gemini-2.5-flash".to_string(),
            secondary: "gemini-2.5-pro".to_string(),
        }
    }
}

/// Asks one model for one measurement.
#[derive(Clone)]
pub struct EstimatorClient {
    slot: ModelSlot,
    model: String,
    prompt: Arc<str>,
    backend: Arc<dyn VisionBackend>,
}

impl EstimatorClient {
    pub fn new(slot: ModelSlot, model: impl Into<String>, backend: Arc<dyn VisionBackend>) -> Self {
        Self {
            slot,
            model: model.into(),
            prompt: Arc::from(build_measurement_prompt()),
            backend,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run one backend call and validate the answer.
    ///
    /// Returns `None` when the call fails or the answer does not parse;
    /// neither case is an error for the caller.
    pub async fn measure(&self, images: &[ImagePayload]) -> Option<Measurement> {
        debug!(slot = %self.slot, model = %self.model, images = images.len(), "Requesting measurement");

        let response = match self.backend.generate(&self.model, &self.prompt, images).await {
            Ok(response) => response,
            Err(e) => {
                warn!(slot = %self.slot, model = %self.model, error = %e, "Backend call failed");
                return None;
            }
        };

        match parse_measurement(&response) {
            Ok(measurement) => {
                debug!(
                    slot = %self.slot,
                    anchor = %measurement.anchor_used,
                    length_ft = measurement.length_ft,
                    width_ft = measurement.width_ft,
                    height_ft = measurement.height_ft,
                    density = measurement.density_factor,
                    "Measurement parsed"
                );
                Some(measurement)
            }
            Err(e) => {
                let preview: String = response.chars().take(RAW_PREVIEW_CHARS).collect();
                warn!(
                    slot = %self.slot,
                    model = %self.model,
                    error = %e,
                    raw = %preview,
                    "Backend answer unusable"
                );
                None
            }
        }
    }
}

/// Both slots' outcomes for one request
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DualMeasurement {
    pub primary: Option<Measurement>,
    pub secondary: Option<Measurement>,
}

impl DualMeasurement {
    pub fn get(&self, slot: ModelSlot) -> Option<&Measurement> {
        match slot {
            ModelSlot::Primary => self.primary.as_ref(),
            ModelSlot::Secondary => self.secondary.as_ref(),
        }
    }

    pub fn usable_count(&self) -> usize {
        ModelSlot::ALL
            .iter()
            .filter(|slot| self.get(**slot).is_some())
            .count()
    }
}

/// Runs the primary and secondary estimators side by side.
///
/// Both calls start before either is awaited, and both always settle: a
/// failure on one side never cancels the other.
#[derive(Clone)]
pub struct DualEstimator {
    primary: EstimatorClient,
    secondary: EstimatorClient,
}

impl DualEstimator {
    pub fn new(backend: Arc<dyn VisionBackend>, roster: &ModelRoster) -> Self {
        Self {
            primary: EstimatorClient::new(ModelSlot::Primary, &roster.primary, Arc::clone(&backend)),
            secondary: EstimatorClient::new(ModelSlot::Secondary, &roster.secondary, backend),
        }
    }

    pub fn client(&self, slot: ModelSlot) -> &EstimatorClient {
        match slot {
            ModelSlot::Primary => &self.primary,
            ModelSlot::Secondary => &self.secondary,
        }
    }

    pub async fn measure_both(&self, images: &[ImagePayload]) -> DualMeasurement {
        let (primary, secondary) =
            tokio::join!(self.primary.measure(images), self.secondary.measure(images));

        DualMeasurement { primary, secondary }
    }
}
