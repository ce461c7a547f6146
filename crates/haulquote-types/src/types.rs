//! Shared estimation and wire types

use serde::{Deserialize, Serialize};

/// Which of the two vision models produced a measurement.
///
/// The set is closed: every estimate fans out to exactly these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSlot {
    Primary,
    Secondary,
}

impl ModelSlot {
    pub const ALL: [ModelSlot; 2] = [ModelSlot::Primary, ModelSlot::Secondary];

    pub fn label(&self) -> &'static str {
        match self {
            ModelSlot::Primary => "primary",
            ModelSlot::Secondary => "secondary",
        }
    }

    pub fn other(&self) -> ModelSlot {
        match self {
            ModelSlot::Primary => ModelSlot::Secondary,
            ModelSlot::Secondary => ModelSlot::Primary,
        }
    }
}

impl std::fmt::Display for ModelSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One backend's bounding-box reading of a junk pile.
///
/// Dimensions are in feet. `density_factor` is how solidly the pile fills
/// its bounding box, 0.0 (empty) to 1.0 (solid).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    /// Reference object the model calibrated against (informational only)
    pub anchor_used: String,
    pub length_ft: f64,
    pub width_ft: f64,
    pub height_ft: f64,
    pub density_factor: f64,
}

impl Measurement {
    pub fn new(length_ft: f64, width_ft: f64, height_ft: f64, density_factor: f64) -> Self {
        Self {
            anchor_used: String::new(),
            length_ft,
            width_ft,
            height_ft,
            density_factor,
        }
    }
}

/// An uploaded image as it arrives in the request body.
///
/// Accepted shapes:
/// - a bare base64 string, optionally prefixed with `data:<mime>;base64,`
/// - `{ "bytes": [..], "mimeType": "image/png" }`
/// - `{ "data": "<base64>", "mimeType": "image/png" }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageInput {
    Encoded(String),
    Raw {
        bytes: Vec<u8>,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
    Inline {
        data: String,
        #[serde(default, rename = "mimeType")]
        mime_type: Option<String>,
    },
}

/// Inbound estimate request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateRequest {
    pub images: Vec<ImageInput>,
}

/// Top-level outcome carried in every estimate response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    Pass,
    SingleSource,
    Fail,
}

/// Machine-readable reason attached to a `FAIL` response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureReason {
    /// Neither backend produced a usable measurement
    Blind,
    /// Both backends answered but disagree beyond tolerance
    HighVariance,
    /// The request was rejected before any backend call
    InvalidRequest,
    /// The service is missing credentials or other configuration
    Configuration,
}

impl ResponseStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ResponseStatus::Pass => "PASS",
            ResponseStatus::SingleSource => "SINGLE_SOURCE",
            ResponseStatus::Fail => "FAIL",
        }
    }
}

impl FailureReason {
    pub fn label(&self) -> &'static str {
        match self {
            FailureReason::Blind => "BLIND",
            FailureReason::HighVariance => "HIGH_VARIANCE",
            FailureReason::InvalidRequest => "INVALID_REQUEST",
            FailureReason::Configuration => "CONFIGURATION",
        }
    }
}

/// Estimate response body.
///
/// Business failures (`BLIND`, `HIGH_VARIANCE`) are encoded here with a
/// successful transport status; only the payload tells them apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResponse {
    pub status: ResponseStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,

    /// Final volume, e.g. "6.0 yds³"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_size: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,

    /// Raw volumes from both models, reported on disagreement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volumes: Option<[f64; 2]>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_diff: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Set when a human has to quote the job instead
    #[serde(default)]
    pub manual_review: bool,
}

impl EstimateResponse {
    pub fn failure(reason: FailureReason, message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Fail,
            reason: Some(reason),
            volume: None,
            price: None,
            load_size: None,
            reasoning: None,
            volumes: None,
            percent_diff: None,
            message: Some(message.into()),
            manual_review: matches!(reason, FailureReason::Blind | FailureReason::HighVariance),
        }
    }

    pub fn has_price(&self) -> bool {
        self.price.is_some()
    }
}
