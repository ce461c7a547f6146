//! Two-model consensus on pile volume

use crate::service::volume::{ceil_to_tenth, volume_cubic_yards};
use haulquote_types::{Measurement, ModelSlot};

/// Largest relative disagreement (difference over mean) still accepted.
/// Equality passes.
pub const VARIANCE_TOLERANCE: f64 = 0.15;

/// Outcome of reconciling the two model measurements for one request.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsensusResult {
    /// Neither model produced a usable measurement
    BothFailed,
    /// Exactly one model produced a usable measurement
    SingleSource { source: ModelSlot, volume: f64 },
    /// Both models agree within tolerance; `volume` is their rounded mean
    Pass { volume: f64, percent_diff: f64 },
    /// Both models answered but disagree beyond tolerance
    HighVariance { volumes: [f64; 2], percent_diff: f64 },
}

impl ConsensusResult {
    /// Volume a price can be derived from, if any.
    pub fn final_volume(&self) -> Option<f64> {
        match self {
            ConsensusResult::SingleSource { volume, .. } | ConsensusResult::Pass { volume, .. } => {
                Some(*volume)
            }
            ConsensusResult::BothFailed | ConsensusResult::HighVariance { .. } => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConsensusResult::BothFailed => "BOTH_FAILED",
            ConsensusResult::SingleSource { .. } => "SINGLE_SOURCE",
            ConsensusResult::Pass { .. } => "PASS",
            ConsensusResult::HighVariance { .. } => "HIGH_VARIANCE",
        }
    }
}

/// Relative difference of two volumes against their mean; 0 when both are 0.
pub fn percent_difference(a: f64, b: f64) -> f64 {
    let avg = (a + b) / 2.0;
    if avg == 0.0 {
        return 0.0;
    }
    (a - b).abs() / avg
}

/// Reconcile the primary and secondary measurements into one decision.
///
/// A measurement whose volume is not finite counts as missing.
pub fn reconcile(
    primary: Option<&Measurement>,
    secondary: Option<&Measurement>,
) -> ConsensusResult {
    match (finite_volume(primary), finite_volume(secondary)) {
        (None, None) => ConsensusResult::BothFailed,
        (Some(volume), None) => single_source(ModelSlot::Primary, volume),
        (None, Some(volume)) => single_source(ModelSlot::Secondary, volume),
        (Some(a), Some(b)) => reconcile_volumes(a, b),
    }
}

fn finite_volume(m: Option<&Measurement>) -> Option<f64> {
    m.map(volume_cubic_yards).filter(|volume| volume.is_finite())
}

fn single_source(source: ModelSlot, volume: f64) -> ConsensusResult {
    ConsensusResult::SingleSource {
        source,
        volume: ceil_to_tenth(volume),
    }
}

/// Variance check on two raw volumes. An undefined difference never passes.
pub fn reconcile_volumes(vol_a: f64, vol_b: f64) -> ConsensusResult {
    let percent_diff = percent_difference(vol_a, vol_b);

    if percent_diff.is_nan() || percent_diff > VARIANCE_TOLERANCE {
        return ConsensusResult::HighVariance {
            volumes: [vol_a, vol_b],
            percent_diff,
        };
    }

    ConsensusResult::Pass {
        volume: ceil_to_tenth((vol_a + vol_b) / 2.0),
        percent_diff,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pile(length: f64) -> Measurement {
        // 1 x 27 x 1 ft at full density: volume in yd³ equals `length`
        Measurement::new(length, 27.0, 1.0, 1.0)
    }

    #[test]
    fn test_both_failed() {
        assert_eq!(reconcile(None, None), ConsensusResult::BothFailed);
        assert!(ConsensusResult::BothFailed.final_volume().is_none());
    }

    #[test]
    fn test_single_source_primary() {
        let m = Measurement::new(10.0, 5.0, 4.0, 0.8);
        let result = reconcile(Some(&m), None);
        match result {
            ConsensusResult::SingleSource { source, volume } => {
                assert_eq!(source, ModelSlot::Primary);
                assert!((volume - 6.0).abs() < 1e-9);
            }
            other => panic!("expected single source, got {:?}", other),
        }
    }

    #[test]
    fn test_single_source_secondary() {
        let m = pile(2.0);
        let result = reconcile(None, Some(&m));
        assert_eq!(
            result,
            ConsensusResult::SingleSource {
                source: ModelSlot::Secondary,
                volume: 2.0
            }
        );
    }

    #[test]
    fn test_pass_uses_rounded_mean() {
        let a = pile(4.0);
        let b = pile(4.5);
        match reconcile(Some(&a), Some(&b)) {
            ConsensusResult::Pass { volume, percent_diff } => {
                assert!((volume - 4.3).abs() < 1e-9);
                assert!((percent_diff - 0.5 / 4.25).abs() < 1e-9);
            }
            other => panic!("expected pass, got {:?}", other),
        }
    }

    #[test]
    fn test_high_variance_reports_both_volumes() {
        let a = pile(2.0);
        let b = pile(6.0);
        match reconcile(Some(&a), Some(&b)) {
            ConsensusResult::HighVariance { volumes, percent_diff } => {
                assert!((volumes[0] - 2.0).abs() < 1e-9);
                assert!((volumes[1] - 6.0).abs() < 1e-9);
                assert!((percent_diff - 1.0).abs() < 1e-9);
            }
            other => panic!("expected high variance, got {:?}", other),
        }
    }

    #[test]
    fn test_exactly_fifteen_percent_passes() {
        // diff 3.0 over mean 20.0
        assert!((percent_difference(21.5, 18.5) - 0.15).abs() < f64::EPSILON);
        assert!(matches!(
            reconcile_volumes(21.5, 18.5),
            ConsensusResult::Pass { .. }
        ));
    }

    #[test]
    fn test_just_over_fifteen_percent_fails() {
        // diff 3.00002 over mean 20.0 -> 0.150001
        assert!(matches!(
            reconcile_volumes(21.50001, 18.49999),
            ConsensusResult::HighVariance { .. }
        ));
    }

    #[test]
    fn test_zero_volumes_pass() {
        let empty = Measurement::new(10.0, 10.0, 10.0, 0.0);
        assert_eq!(
            reconcile(Some(&empty), Some(&empty)),
            ConsensusResult::Pass {
                volume: 0.0,
                percent_diff: 0.0
            }
        );
    }

    #[test]
    fn test_zero_against_nonzero_is_high_variance() {
        let empty = Measurement::new(10.0, 10.0, 10.0, 0.0);
        let full = pile(1.0);
        assert!(matches!(
            reconcile(Some(&empty), Some(&full)),
            ConsensusResult::HighVariance { .. }
        ));
    }

    #[test]
    fn test_overflowing_volume_never_passes() {
        let normal = Measurement::new(10.0, 5.0, 4.0, 0.8);
        let huge = Measurement::new(1e200, 1e200, 1.0, 1.0);

        let result = reconcile(Some(&normal), Some(&huge));
        match result {
            ConsensusResult::SingleSource { source, volume } => {
                assert_eq!(source, ModelSlot::Primary);
                assert!((volume - 6.0).abs() < 1e-9);
            }
            other => panic!("expected single source, got {:?}", other),
        }
        assert_eq!(reconcile(Some(&huge), Some(&huge)), ConsensusResult::BothFailed);
    }

    #[test]
    fn test_nan_difference_is_high_variance() {
        assert!(matches!(
            reconcile_volumes(f64::INFINITY, 6.0),
            ConsensusResult::HighVariance { .. }
        ));
        assert!(reconcile_volumes(f64::INFINITY, f64::INFINITY)
            .final_volume()
            .is_none());
    }

    #[test]
    fn test_labels() {
        assert_eq!(ConsensusResult::BothFailed.label(), "BOTH_FAILED");
        assert_eq!(reconcile_volumes(1.0, 1.0).label(), "PASS");
        assert_eq!(reconcile_volumes(1.0, 3.0).label(), "HIGH_VARIANCE");
    }

    proptest! {
        #[test]
        fn prop_reconcile_is_commutative(
            a in 0.0f64..40.0,
            b in 0.0f64..40.0,
        ) {
            let ma = pile(a);
            let mb = pile(b);
            let ab = reconcile(Some(&ma), Some(&mb));
            let ba = reconcile(Some(&mb), Some(&ma));
            prop_assert_eq!(ab.label(), ba.label());
            prop_assert_eq!(ab.final_volume(), ba.final_volume());
        }
    }
}
