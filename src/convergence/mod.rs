//! Statistical convergence judgment over the simulator's estimate stream.
//!
//! The external Monte-Carlo simulator periodically reports a
//! [`ConvergenceSample`]. A [`SampleHistory`] owned by the session collects
//! them in order, and [`evaluator::evaluate`] turns the latest sample plus a
//! trailing window into a [`ConvergenceReport`]: four independent criteria,
//! a stop decision, and sentinel-safe display statistics.

pub mod evaluator;
pub mod sample;

pub use evaluator::{
    evaluate, ConvergenceReport, ConvergenceStatus, CriterionResults, STABILITY_WINDOW,
};
pub use sample::{ConvergenceSample, SampleHistory};
