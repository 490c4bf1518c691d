//! SPC status evaluation
//!
//! Deterministic two-rule scheme: the latest sample decides
//! out-of-spec, and a short monotonic approach to a control limit
//! decides warning. This separates genuine drift from transient
//! noise without any randomness.

use floorsight_types::{Sample, SpcStatus};

use crate::config::{SpcConfig, SpcLimits};

/// Evaluate SPC status over a window of samples, oldest first.
///
/// - empty window: `InsufficientData`
/// - latest sample outside [target - tolerance, target + tolerance]:
///   `OutOfSpec`
/// - trailing `trend_length` samples moving monotonically toward a
///   limit, each within `drift_band * tolerance` of that limit:
///   `Warning`
/// - otherwise `Stable`
pub fn evaluate_spc(samples: &[Sample], limits: SpcLimits, config: &SpcConfig) -> SpcStatus {
    let Some(latest) = samples.last() else {
        return SpcStatus::InsufficientData;
    };

    if latest.value > limits.upper() || latest.value < limits.lower() {
        return SpcStatus::OutOfSpec;
    }

    if drifting_toward_limit(samples, limits, config) {
        return SpcStatus::Warning;
    }

    SpcStatus::Stable
}

fn drifting_toward_limit(samples: &[Sample], limits: SpcLimits, config: &SpcConfig) -> bool {
    let k = config.trend_length;
    if k < 2 || samples.len() < k {
        return false;
    }
    let tail = &samples[samples.len() - k..];
    let band = config.drift_band * limits.tolerance;

    let rising = tail.windows(2).all(|pair| pair[1].value > pair[0].value);
    if rising && tail.iter().all(|s| limits.upper() - s.value <= band) {
        return true;
    }

    let falling = tail.windows(2).all(|pair| pair[1].value < pair[0].value);
    if falling && tail.iter().all(|s| s.value - limits.lower() <= band) {
        return true;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(values: &[f64]) -> Vec<Sample> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Sample::new(i as u64, *v))
            .collect()
    }

    fn limits() -> SpcLimits {
        SpcLimits::new(10.00, 0.05)
    }

    fn config() -> SpcConfig {
        SpcConfig::default()
    }

    #[test]
    fn empty_window_is_insufficient_data() {
        assert_eq!(
            evaluate_spc(&[], limits(), &config()),
            SpcStatus::InsufficientData
        );
    }

    #[test]
    fn in_spec_sequence_transitions_to_out_of_spec() {
        // target=10.00, tolerance=0.05; the quality-page example.
        let window = samples(&[10.01]);
        assert_eq!(evaluate_spc(&window, limits(), &config()), SpcStatus::Stable);

        let window = samples(&[10.01, 10.02]);
        assert_eq!(evaluate_spc(&window, limits(), &config()), SpcStatus::Stable);

        let window = samples(&[10.01, 10.02, 10.06]);
        assert_eq!(
            evaluate_spc(&window, limits(), &config()),
            SpcStatus::OutOfSpec
        );
    }

    #[test]
    fn below_lower_limit_is_out_of_spec() {
        let window = samples(&[10.00, 9.94]);
        assert_eq!(
            evaluate_spc(&window, limits(), &config()),
            SpcStatus::OutOfSpec
        );
    }

    #[test]
    fn monotonic_approach_inside_band_is_warning() {
        // All three within 0.5 * 0.05 = 0.025 of the 10.05 limit and rising.
        let window = samples(&[10.00, 10.03, 10.035, 10.04]);
        assert_eq!(
            evaluate_spc(&window, limits(), &config()),
            SpcStatus::Warning
        );
    }

    #[test]
    fn approach_toward_lower_limit_is_warning() {
        let window = samples(&[9.974, 9.966, 9.96]);
        assert_eq!(
            evaluate_spc(&window, limits(), &config()),
            SpcStatus::Warning
        );
    }

    #[test]
    fn trend_outside_band_is_stable() {
        // Rising but far from either limit.
        let window = samples(&[9.99, 10.00, 10.01]);
        assert_eq!(evaluate_spc(&window, limits(), &config()), SpcStatus::Stable);
    }

    #[test]
    fn non_monotonic_tail_is_stable() {
        let window = samples(&[10.03, 10.04, 10.035]);
        assert_eq!(evaluate_spc(&window, limits(), &config()), SpcStatus::Stable);
    }

    #[test]
    fn short_window_cannot_warn() {
        let window = samples(&[10.03, 10.04]);
        assert_eq!(evaluate_spc(&window, limits(), &config()), SpcStatus::Stable);
    }
}
