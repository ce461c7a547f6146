//! Vision module - dual-model measurement of junk piles from photos

pub mod ai;
pub mod estimator;
pub mod parse;
pub mod payload;

// Re-export main types for convenience
pub use ai::backend::VisionBackend;
pub use ai::gemini::GeminiBackend;
pub use ai::prompts::build_measurement_prompt;
pub use estimator::{DualEstimator, DualMeasurement, EstimatorClient, ModelRoster};
pub use parse::{extract_json_from_response, parse_measurement, MeasurementError};
pub use payload::{decode_images, ImagePayload, MAX_IMAGES};
