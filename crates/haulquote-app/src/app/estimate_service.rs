//! Estimate Service - the photo estimate endpoint
//!
//! Workflow for one request:
//! 1. Refuse immediately if the vision backend is not configured
//! 2. Parse the body and validate the image list (1-10 images)
//! 3. Ask both models for a measurement concurrently
//! 4. Reconcile the two measurements
//! 5. Derive price and load size from the final volume, if there is one
//!
//! Only configuration problems and bad requests leave the 2xx range.
//! Everything the models do wrong ends up in the payload's status.

use haulquote_domain::{derive_quote, format_volume, reconcile, ConsensusResult, VARIANCE_TOLERANCE};
use haulquote_types::{
    EstimateRequest, EstimateResponse, FailureReason, ModelSlot, RequestError, ResponseStatus,
};
use haulquote_vision::{decode_images, DualEstimator};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

/// Transport status plus body, independent of any HTTP framework
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointResponse {
    pub status_code: u16,
    pub body: EstimateResponse,
}

impl EndpointResponse {
    fn ok(body: EstimateResponse) -> Self {
        Self {
            status_code: 200,
            body,
        }
    }

    fn bad_request(error: &RequestError) -> Self {
        Self {
            status_code: 400,
            body: EstimateResponse::failure(FailureReason::InvalidRequest, error.to_string()),
        }
    }

    fn misconfigured(reason: &str) -> Self {
        Self {
            status_code: 500,
            body: EstimateResponse::failure(FailureReason::Configuration, reason),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// The estimate endpoint.
///
/// Holds either a ready estimator or the reason it could not be built.
#[derive(Clone)]
pub struct EstimateService {
    estimator: std::result::Result<DualEstimator, String>,
}

impl EstimateService {
    pub fn new(estimator: DualEstimator) -> Self {
        Self {
            estimator: Ok(estimator),
        }
    }

    /// A service that answers every request with a configuration error
    pub fn unconfigured(reason: impl Into<String>) -> Self {
        Self {
            estimator: Err(reason.into()),
        }
    }

    /// Handle a raw JSON request body
    pub async fn handle(&self, body: &[u8]) -> EndpointResponse {
        let request_id = Uuid::new_v4();
        async {
            let estimator = match &self.estimator {
                Ok(estimator) => estimator,
                Err(reason) => {
                    warn!(reason = %reason, "Rejecting estimate: service not configured");
                    return EndpointResponse::misconfigured(reason);
                }
            };

            let request: EstimateRequest = match serde_json::from_slice(body) {
                Ok(request) => request,
                Err(e) => {
                    let error = RequestError::MalformedBody(e.to_string());
                    warn!(error = %error, "Rejecting estimate");
                    return EndpointResponse::bad_request(&error);
                }
            };

            run(estimator, &request).await
        }
        .instrument(info_span!("estimate", %request_id))
        .await
    }
}

async fn run(estimator: &DualEstimator, request: &EstimateRequest) -> EndpointResponse {
    let images = match decode_images(&request.images) {
        Ok(images) => images,
        Err(error) => {
            warn!(error = %error, "Rejecting estimate");
            return EndpointResponse::bad_request(&error);
        }
    };

    let measurements = estimator.measure_both(&images).await;
    let consensus = reconcile(measurements.primary.as_ref(), measurements.secondary.as_ref());

    info!(
        images = images.len(),
        usable = measurements.usable_count(),
        outcome = consensus.label(),
        final_volume = ?consensus.final_volume(),
        "Estimate reconciled"
    );

    EndpointResponse::ok(build_response(&consensus, estimator))
}

/// Turn a consensus decision into the response payload
pub fn build_response(consensus: &ConsensusResult, estimator: &DualEstimator) -> EstimateResponse {
    let model = |slot: ModelSlot| estimator.client(slot).model().to_string();

    match consensus {
        ConsensusResult::BothFailed => EstimateResponse::failure(
            FailureReason::Blind,
            "Neither model returned a usable measurement. This job needs a manual quote.",
        ),

        ConsensusResult::HighVariance {
            volumes,
            percent_diff,
        } => {
            let mut response = EstimateResponse::failure(
                FailureReason::HighVariance,
                format!(
                    "Models disagree by {:.1}% (limit {:.0}%). This job needs a manual quote.",
                    percent_diff * 100.0,
                    VARIANCE_TOLERANCE * 100.0
                ),
            );
            response.volumes = Some(*volumes);
            response.percent_diff = Some(*percent_diff);
            response
        }

        ConsensusResult::Pass {
            volume,
            percent_diff,
        } => priced(
            ResponseStatus::Pass,
            *volume,
            format!(
                "Consensus reached: {} and {} agree within {:.1}% (limit {:.0}%). \
                 Volume is their average, rounded up.",
                model(ModelSlot::Primary),
                model(ModelSlot::Secondary),
                percent_diff * 100.0,
                VARIANCE_TOLERANCE * 100.0
            ),
        ),

        ConsensusResult::SingleSource { source, volume } => priced(
            ResponseStatus::SingleSource,
            *volume,
            format!(
                "Single-model fallback: only {} ({}) returned a usable measurement; \
                 {} ({}) did not.",
                model(*source),
                source,
                model(source.other()),
                source.other()
            ),
        ),
    }
}

fn priced(status: ResponseStatus, volume: f64, reasoning: String) -> EstimateResponse {
    let quote = derive_quote(volume);
    EstimateResponse {
        status,
        reason: None,
        volume: Some(format_volume(volume)),
        price: Some(quote.price_range.to_string()),
        load_size: Some(quote.load_size.label().to_string()),
        reasoning: Some(reasoning),
        volumes: None,
        percent_diff: None,
        message: None,
        manual_review: false,
    }
}
