//! Simulator samples and the session-scoped history that collects them.
//!
//! A sample is a transient record produced outside this crate; the core never
//! persists it. The history replaces what used to be a process-global
//! "current results" holder: it is owned by exactly one analysis session and
//! passed explicitly to whoever needs the stream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One reported snapshot of a running Monte-Carlo estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceSample {
    /// Monotonic iteration count at the time of the report.
    pub iteration: u64,
    /// Point estimate of this report.
    pub estimate: f64,
    /// Running mean estimate across all iterations so far.
    pub mean_estimate: f64,
    /// Lower confidence-interval bound.
    pub ci_lower: f64,
    /// Upper confidence-interval bound.
    pub ci_upper: f64,
    /// Confidence-interval width.
    pub ci_width: f64,
    /// Caller-configured accepted error the run is aiming for.
    pub accepted_error: f64,
    /// Standard error of the mean estimate.
    pub std_error: f64,
}

/// Chronological sample stream for one simulation run.
///
/// Samples arrive one at a time and are kept in iteration order. A sample
/// whose iteration does not advance past the last recorded one is dropped
/// (the stream contract promises monotonic iterations; a stale report is
/// noise, not an error).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SampleHistory {
    samples: Vec<ConvergenceSample>,
    /// When the first sample of the run arrived.
    pub started_at: Option<DateTime<Utc>>,
    /// When the most recent sample arrived.
    pub last_sample_at: Option<DateTime<Utc>>,
}

impl SampleHistory {
    /// An empty history for a fresh run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sample. Returns `false` (and records nothing) when the
    /// sample's iteration is not beyond the latest recorded one.
    pub fn push(&mut self, sample: ConvergenceSample) -> bool {
        if let Some(last) = self.samples.last() {
            if sample.iteration <= last.iteration {
                warn!(
                    incoming = sample.iteration,
                    latest = last.iteration,
                    "dropping out-of-order convergence sample"
                );
                return false;
            }
        }
        let now = Utc::now();
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
        self.last_sample_at = Some(now);
        self.samples.push(sample);
        true
    }

    /// The most recent sample, if any.
    pub fn latest(&self) -> Option<&ConvergenceSample> {
        self.samples.last()
    }

    /// The trailing `n` mean estimates, oldest first. Shorter than `n` while
    /// the run is young.
    pub fn trailing_means(&self, n: usize) -> Vec<f64> {
        let start = self.samples.len().saturating_sub(n);
        self.samples[start..].iter().map(|s| s.mean_estimate).collect()
    }

    /// Number of recorded samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when no sample has arrived yet.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Drops all samples, ready for a new run.
    pub fn clear(&mut self) {
        self.samples.clear();
        self.started_at = None;
        self.last_sample_at = None;
    }
}
