//! Failure and repair distributions for base events.
//!
//! Each distribution kind is its own variant carrying only its own
//! parameters. This keeps "which fields are valid for this kind" questions
//! out of the model entirely: a `Weibull` value cannot be missing its shape,
//! and a `Constant` cannot carry a stray rate.

use serde::{Deserialize, Serialize};

/// A probability distribution attached to a base event.
///
/// Used both for failure behavior and, optionally, repair behavior. Rates are
/// per hour; times are in hours, matching the mission-time unit in
/// [`crate::config::SimulationSettings`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Distribution {
    /// Exponential with failure rate `rate` (λ).
    Exponential {
        rate: f64,
    },
    /// Three-parameter Weibull: shape (k), scale (λ), location (μ).
    Weibull {
        shape: f64,
        scale: f64,
        location: f64,
    },
    /// Normal with mean (μ) and standard deviation (σ).
    Normal {
        mean: f64,
        std_dev: f64,
    },
    /// Fixed probability of failure, independent of time.
    Constant {
        probability: f64,
    },
}

impl Default for Distribution {
    /// New base events fail exponentially with a rate of 1e-3 per hour until
    /// the user says otherwise.
    fn default() -> Self {
        Distribution::Exponential { rate: 1e-3 }
    }
}

impl Distribution {
    /// Short lowercase label used in logs and definition statements.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Distribution::Exponential { .. } => "exponential",
            Distribution::Weibull { .. } => "weibull",
            Distribution::Normal { .. } => "normal",
            Distribution::Constant { .. } => "constant",
        }
    }

    /// The distribution parameters in declaration order, for serialization
    /// into a definition statement.
    pub fn parameters(&self) -> Vec<f64> {
        match self {
            Distribution::Exponential { rate } => vec![*rate],
            Distribution::Weibull {
                shape,
                scale,
                location,
            } => vec![*shape, *scale, *location],
            Distribution::Normal { mean, std_dev } => vec![*mean, *std_dev],
            Distribution::Constant { probability } => vec![*probability],
        }
    }
}
