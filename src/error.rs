//! Custom error types for the fault tree core.
//!
//! This module defines the primary error type, `FaultTreeError`, for the whole
//! crate. Using the `thiserror` crate, it provides a centralized and
//! consistent way to handle the few failure modes the core can actually hit.
//!
//! Most anomalies in this crate are deliberately NOT errors. The editing
//! surface must stay usable over a transiently inconsistent graph, so mutation
//! operations recover locally (a mutation naming an unknown id is a no-op, a
//! cycle encountered during export drops the back edge, a non-finite statistic
//! becomes a documented sentinel). What remains as `FaultTreeError`:
//!
//! - **`Config`**: Wraps errors from the `config` crate, typically file
//!   parsing or format issues in the configuration files.
//! - **`Configuration`**: Semantic errors in the configuration, such as values
//!   that parse fine but are logically invalid (a negative mission time, a
//!   zero convergence window). Caught during the validation step.
//! - **`Serialization`**: Wraps `serde_json` errors from snapshot and export
//!   plan serialization helpers.

use thiserror::Error;

/// Convenience alias for results using the crate error type.
pub type AppResult<T> = std::result::Result<T, FaultTreeError>;

/// Primary error type for the fault tree core.
///
/// Recoverable anomalies (unknown ids, cycles, non-finite statistics) never
/// surface here; they are absorbed by the operation that met them. See the
/// module documentation for the taxonomy.
#[derive(Error, Debug)]
pub enum FaultTreeError {
    /// Error originating from the `config` crate while reading settings files.
    #[error("Configuration file error: {0}")]
    Config(#[from] config::ConfigError),

    /// A configuration value parsed but failed semantic validation.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// JSON serialization of a snapshot or export plan failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
