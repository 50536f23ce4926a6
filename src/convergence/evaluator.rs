//! The four-criterion convergence evaluation.
//!
//! `evaluate` is a pure function of the latest sample, the trailing window of
//! mean estimates, and the iteration ceiling. It keeps no state and performs
//! no I/O; the session owns the stream and calls in here once per sample.
//!
//! The primary precision criterion alone gates the exposed `converged`
//! decision. The three support criteria are computed and surfaced for
//! display, along with how many of them hold, so a caller preferring the
//! stricter "primary plus at least two of three" rule can apply it directly
//! from the report.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::numeric::{clamp_probability, finite_or, format_ratio};

use super::sample::ConvergenceSample;

/// Number of trailing mean estimates the stability criterion looks at.
pub const STABILITY_WINDOW: usize = 10;

/// Upper bound on `ci_width / mean` for the relative-precision criterion.
const RELATIVE_PRECISION_LIMIT: f64 = 0.25;
/// Mean estimates at or below this are treated as numerically zero.
const NEAR_ZERO_MEAN: f64 = 1e-6;
/// Absolute CI-width fallback applied when the mean is numerically zero.
const NEAR_ZERO_CI_WIDTH: f64 = 1e-5;
/// Minimum Bernoulli effective sample size for the robustness criterion.
const MIN_EFFECTIVE_SAMPLES: f64 = 10.0;
/// Upper bound on the coefficient of variation for temporal stability.
const STABILITY_CV_LIMIT: f64 = 0.10;

/// Outcome of each independent criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionResults {
    /// Criterion 1: CI width within the accepted error (requires a positive
    /// accepted error). This is the controlling criterion.
    pub precision_ci: bool,
    /// Criterion 2: CI width small relative to the mean estimate, with an
    /// absolute fallback near zero.
    pub relative_precision: bool,
    /// Criterion 3: Bernoulli effective sample size large enough.
    pub robustness: bool,
    /// Criterion 4: trailing mean estimates stable over the window.
    pub temporal_stability: bool,
}

impl CriterionResults {
    /// How many of the three support criteria hold (0 to 3).
    pub fn support_criteria_met(&self) -> u8 {
        u8::from(self.relative_precision)
            + u8::from(self.robustness)
            + u8::from(self.temporal_stability)
    }
}

/// Three-way progress classification surfaced to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvergenceStatus {
    /// The iteration ceiling was exceeded before convergence.
    MaxIterationsReached,
    /// The controlling precision criterion holds.
    Converged,
    /// Still running.
    InProgress,
}

/// Full evaluation result for one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceReport {
    /// Iteration the report describes.
    pub iteration: u64,
    /// The four criterion outcomes.
    pub criteria: CriterionResults,
    /// The stop decision: the controlling precision criterion alone.
    pub converged: bool,
    /// Count of satisfied support criteria, for callers applying a stricter
    /// stop rule.
    pub support_criteria_met: u8,
    /// Progress classification including the iteration ceiling.
    pub status: ConvergenceStatus,
    /// `ci_width / accepted_error`, formatted to three decimals, or the
    /// `"undefined"` sentinel when the accepted error is zero.
    pub precision_ratio: String,
    /// Bernoulli effective sample size `i * p * (1 - p)`.
    pub effective_sample_size: f64,
    /// Coefficient of variation over the trailing window; `None` until the
    /// window is full or when the window mean is not positive.
    pub coefficient_of_variation: Option<f64>,
    /// Mean estimate as a percentage.
    pub unreliability_percent: f64,
    /// Complement of the mean estimate as a percentage.
    pub reliability_percent: f64,
}

/// Evaluates all criteria for the latest sample.
///
/// `trailing_means` is the chronological window of recent mean estimates
/// (see [`STABILITY_WINDOW`]); only the last `STABILITY_WINDOW` entries are
/// considered. `max_iterations` is the caller-supplied ceiling for the
/// status classification. Total for any input, including non-finite
/// garbage: every returned number is finite.
pub fn evaluate(
    sample: &ConvergenceSample,
    trailing_means: &[f64],
    max_iterations: u64,
) -> ConvergenceReport {
    let iteration = sample.iteration;
    let mean = sample.mean_estimate;
    let width = sample.ci_width;
    let accepted_error = sample.accepted_error;

    // Criterion 1: CI width within the accepted error.
    let precision_ci = accepted_error > 0.0 && width <= accepted_error;

    // Criterion 2: relative precision, with an absolute fallback so a mean
    // near zero cannot blow the ratio up.
    let relative_precision = if mean > NEAR_ZERO_MEAN {
        finite_or(width / mean, f64::MAX) <= RELATIVE_PRECISION_LIMIT
    } else {
        width <= NEAR_ZERO_CI_WIDTH
    };

    // Criterion 3: Bernoulli-variance proxy for informative trial count.
    let effective_sample_size = finite_or(iteration as f64 * mean * (1.0 - mean), 0.0);
    let robustness = effective_sample_size >= MIN_EFFECTIVE_SAMPLES;

    // Criterion 4: stability of the trailing mean estimates.
    let coefficient_of_variation = trailing_coefficient_of_variation(trailing_means);
    let temporal_stability =
        coefficient_of_variation.is_some_and(|cv| cv < STABILITY_CV_LIMIT);

    let criteria = CriterionResults {
        precision_ci,
        relative_precision,
        robustness,
        temporal_stability,
    };

    let status = if iteration > max_iterations {
        ConvergenceStatus::MaxIterationsReached
    } else if precision_ci {
        ConvergenceStatus::Converged
    } else {
        ConvergenceStatus::InProgress
    };
    debug!(iteration, ?status, "convergence sample evaluated");

    let unreliability_percent = clamp_probability(mean) * 100.0;

    ConvergenceReport {
        iteration,
        criteria,
        converged: precision_ci,
        support_criteria_met: criteria.support_criteria_met(),
        status,
        precision_ratio: format_ratio(width, accepted_error),
        effective_sample_size,
        coefficient_of_variation,
        unreliability_percent,
        reliability_percent: 100.0 - unreliability_percent,
    }
}

/// Coefficient of variation over the last [`STABILITY_WINDOW`] entries.
///
/// `None` while fewer than [`STABILITY_WINDOW`] estimates exist, and when
/// the window mean is not positive (the ratio is undefined there, which the
/// criterion treats as "not stable").
fn trailing_coefficient_of_variation(means: &[f64]) -> Option<f64> {
    if means.len() < STABILITY_WINDOW {
        return None;
    }
    let window = &means[means.len() - STABILITY_WINDOW..];
    let n = window.len() as f64;
    let mean: f64 = window.iter().sum::<f64>() / n;
    if !mean.is_finite() || mean <= 0.0 {
        return None;
    }
    // Sample variance with Bessel's correction.
    let variance: f64 = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let cv = variance.sqrt() / mean;
    cv.is_finite().then_some(cv)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(iteration: u64, mean: f64, ci_width: f64, accepted_error: f64) -> ConvergenceSample {
        ConvergenceSample {
            iteration,
            estimate: mean,
            mean_estimate: mean,
            ci_lower: mean - ci_width / 2.0,
            ci_upper: mean + ci_width / 2.0,
            ci_width,
            accepted_error,
            std_error: ci_width / 3.92,
        }
    }

    #[test]
    fn test_precision_criterion_tracks_accepted_error_exactly() {
        let strict = sample(500, 0.001234, 0.00006, 0.00005);
        let report = evaluate(&strict, &[], 100_000);
        assert!(!report.criteria.precision_ci);
        assert!(!report.converged);

        let relaxed = sample(500, 0.001234, 0.00006, 0.0001);
        let report = evaluate(&relaxed, &[], 100_000);
        assert!(report.criteria.precision_ci);
        assert!(report.converged);
        assert_eq!(report.status, ConvergenceStatus::Converged);
    }

    #[test]
    fn test_precision_requires_positive_accepted_error() {
        let s = sample(500, 0.001, 0.0, 0.0);
        let report = evaluate(&s, &[], 100_000);
        assert!(!report.criteria.precision_ci);
        assert_eq!(report.precision_ratio, "undefined");
    }

    #[test]
    fn test_relative_precision_uses_ratio_above_near_zero() {
        // w / mean = 0.0002 / 0.001 = 0.2 <= 0.25
        let s = sample(500, 0.001, 0.0002, 0.0001);
        assert!(evaluate(&s, &[], 100_000).criteria.relative_precision);

        // 0.0004 / 0.001 = 0.4 > 0.25
        let s = sample(500, 0.001, 0.0004, 0.0001);
        assert!(!evaluate(&s, &[], 100_000).criteria.relative_precision);
    }

    #[test]
    fn test_relative_precision_falls_back_near_zero_mean() {
        let s = sample(500, 0.0, 0.000009, 0.0001);
        assert!(evaluate(&s, &[], 100_000).criteria.relative_precision);

        let s = sample(500, 0.0, 0.00002, 0.0001);
        assert!(!evaluate(&s, &[], 100_000).criteria.relative_precision);
    }

    #[test]
    fn test_effective_sample_size_threshold() {
        // 1000 * 0.01 * 0.99 = 9.9 < 10
        let s = sample(1000, 0.01, 0.001, 0.0001);
        let report = evaluate(&s, &[], 100_000);
        assert!((report.effective_sample_size - 9.9).abs() < 1e-9);
        assert!(!report.criteria.robustness);

        // 2000 * 0.01 * 0.99 = 19.8 >= 10
        let s = sample(2000, 0.01, 0.001, 0.0001);
        let report = evaluate(&s, &[], 100_000);
        assert!((report.effective_sample_size - 19.8).abs() < 1e-9);
        assert!(report.criteria.robustness);
    }

    #[test]
    fn test_stability_holds_for_identical_estimates() {
        let window = vec![0.001; 10];
        let s = sample(5000, 0.001, 0.0001, 0.0001);
        let report = evaluate(&s, &window, 100_000);
        assert_eq!(report.coefficient_of_variation, Some(0.0));
        assert!(report.criteria.temporal_stability);
    }

    #[test]
    fn test_stability_fails_for_alternating_estimates() {
        let window: Vec<f64> = (0..10)
            .map(|i| if i % 2 == 0 { 0.0008 } else { 0.0012 })
            .collect();
        let s = sample(5000, 0.001, 0.0001, 0.0001);
        let report = evaluate(&s, &window, 100_000);
        let cv = report.coefficient_of_variation.unwrap();
        assert!(cv > STABILITY_CV_LIMIT);
        assert!(!report.criteria.temporal_stability);
    }

    #[test]
    fn test_stability_needs_a_full_window() {
        let window = vec![0.001; 9];
        let s = sample(5000, 0.001, 0.0001, 0.0001);
        let report = evaluate(&s, &window, 100_000);
        assert_eq!(report.coefficient_of_variation, None);
        assert!(!report.criteria.temporal_stability);
    }

    #[test]
    fn test_stability_is_undefined_for_non_positive_window_mean() {
        let window = vec![0.0; 10];
        let s = sample(5000, 0.0, 0.0001, 0.0001);
        let report = evaluate(&s, &window, 100_000);
        assert_eq!(report.coefficient_of_variation, None);
        assert!(!report.criteria.temporal_stability);
    }

    #[test]
    fn test_max_iterations_overrides_convergence() {
        let s = sample(150_001, 0.001, 0.00001, 0.0001);
        let report = evaluate(&s, &[], 150_000);
        assert!(report.converged);
        assert_eq!(report.status, ConvergenceStatus::MaxIterationsReached);
    }

    #[test]
    fn test_ratio_formats_to_three_decimals() {
        let s = sample(500, 0.001234, 0.00006, 0.0001);
        let report = evaluate(&s, &[], 100_000);
        assert_eq!(report.precision_ratio, "0.600");
    }

    #[test]
    fn test_support_count_reflects_satisfied_criteria() {
        // relative precision holds (0.2), robustness holds, stability window
        // absent: 2 of 3.
        let s = sample(100_000, 0.001, 0.0002, 0.0001);
        let report = evaluate(&s, &[], 200_000);
        assert!(report.criteria.relative_precision);
        assert!(report.criteria.robustness);
        assert!(!report.criteria.temporal_stability);
        assert_eq!(report.support_criteria_met, 2);
    }

    #[test]
    fn test_non_finite_sample_values_yield_finite_report() {
        let s = ConvergenceSample {
            iteration: 100,
            estimate: f64::NAN,
            mean_estimate: f64::NAN,
            ci_lower: f64::NEG_INFINITY,
            ci_upper: f64::INFINITY,
            ci_width: f64::INFINITY,
            accepted_error: 0.0,
            std_error: f64::NAN,
        };
        let report = evaluate(&s, &[], 100_000);
        assert!(report.effective_sample_size.is_finite());
        assert!(report.unreliability_percent.is_finite());
        assert!(report.reliability_percent.is_finite());
        assert_eq!(report.precision_ratio, "undefined");
        assert!(!report.converged);
    }
}
