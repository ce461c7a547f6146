//! Application use cases

pub mod estimate_service;

pub use estimate_service::{build_response, EndpointResponse, EstimateService};

use crate::config::Config;
use haulquote_types::Result;
use haulquote_vision::{DualEstimator, GeminiBackend};
use std::sync::Arc;
use tracing::warn;

/// Build the two-model estimator from configuration.
///
/// The API key is read here, once; the resulting estimator is shared by
/// every request.
pub fn build_estimator(config: &Config) -> Result<DualEstimator> {
    let backend = GeminiBackend::from_env(
        &config.api_key_env,
        config.base_url.clone(),
        config.connect_timeout(),
    )?;

    Ok(DualEstimator::new(Arc::new(backend), &config.roster()))
}

/// Build the estimate endpoint. A configuration failure does not abort
/// startup; the service reports it on every request instead.
pub fn service_from_config(config: &Config) -> EstimateService {
    match build_estimator(config) {
        Ok(estimator) => EstimateService::new(estimator),
        Err(e) => {
            warn!(error = %e, "Estimate service starting unconfigured");
            EstimateService::unconfigured(e.to_string())
        }
    }
}
