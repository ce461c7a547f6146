//! Strict parsing of backend answers into measurements

use haulquote_types::Measurement;
use serde::Deserialize;
use thiserror::Error;

/// Why a backend answer could not become a measurement
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeasurementError {
    #[error("response is not valid JSON: {0}")]
    NotJson(String),

    #[error("missing field '{0}'")]
    MissingField(&'static str),

    #[error("field '{field}' is not a finite non-negative number: {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("density_factor {0} is above 1.0")]
    DensityAboveOne(f64),

    #[error("dimensions {length} x {width} x {height} ft do not give a finite volume")]
    VolumeNotFinite { length: f64, width: f64, height: f64 },
}

#[derive(Debug, Deserialize)]
struct RawMeasurement {
    #[serde(default)]
    anchor_used: Option<String>,
    #[serde(default)]
    dimensions_ft: Option<RawDimensions>,
    #[serde(default)]
    density_factor: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawDimensions {
    #[serde(default)]
    length: Option<f64>,
    #[serde(default)]
    width: Option<f64>,
    #[serde(default)]
    height: Option<f64>,
}

/// Extract JSON from response (handles markdown code blocks)
pub fn extract_json_from_response(response: &str) -> String {
    let response = response.trim();

    if response.starts_with("```") {
        if let Some(end) = response.rfind("```") {
            let start = response.find('\n').map(|i| i + 1).unwrap_or(3);
            if start < end {
                return response[start..end].trim().to_string();
            }
        }
    }

    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if start < end {
                return response[start..=end].to_string();
            }
        }
    }

    response.to_string()
}

/// Parse and validate a backend answer.
///
/// Every numeric field must be present, finite and non-negative, and the
/// density factor must not exceed 1.0. The dimensions multiplied together
/// must stay finite. Any extra fields (a volume the model
/// computed on its own, for instance) are ignored.
pub fn parse_measurement(response: &str) -> Result<Measurement, MeasurementError> {
    let json_str = extract_json_from_response(response);

    let raw: RawMeasurement = serde_json::from_str(&json_str)
        .map_err(|e| MeasurementError::NotJson(e.to_string()))?;

    let dims = raw
        .dimensions_ft
        .ok_or(MeasurementError::MissingField("dimensions_ft"))?;

    let length = require("dimensions_ft.length", dims.length)?;
    let width = require("dimensions_ft.width", dims.width)?;
    let height = require("dimensions_ft.height", dims.height)?;
    let density = require("density_factor", raw.density_factor)?;

    if density > 1.0 {
        return Err(MeasurementError::DensityAboveOne(density));
    }

    if !(length * width * height * density).is_finite() {
        return Err(MeasurementError::VolumeNotFinite {
            length,
            width,
            height,
        });
    }

    Ok(Measurement {
        anchor_used: raw.anchor_used.unwrap_or_default(),
        length_ft: length,
        width_ft: width,
        height_ft: height,
        density_factor: density,
    })
}

fn require(field: &'static str, value: Option<f64>) -> Result<f64, MeasurementError> {
    let value = value.ok_or(MeasurementError::MissingField(field))?;
    if !value.is_finite() || value < 0.0 {
        return Err(MeasurementError::OutOfRange { field, value });
    }
    Ok(value)
}
