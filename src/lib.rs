//! # Dynamic Fault Tree Core Library
//!
//! This crate is the core library behind a dynamic fault tree (DFT) editor for
//! reliability engineering. It owns the fault-tree graph model and its mutation
//! operations, the topological export ordering consumed by an external
//! Monte-Carlo reliability simulator, and the statistical convergence engine
//! that judges the simulator's returned estimate stream. The diagram surface,
//! file-format import/export, and the sampling engine itself live outside this
//! crate and talk to it through plain data types.
//!
//! ## Crate Structure
//!
//! The library is organized into several modules, each with a distinct
//! responsibility:
//!
//! - **`config`**: Structures for loading and validating tool configuration
//!   from TOML files (simulation parameters, convergence thresholds, layout
//!   grid). See [`config::Settings`].
//! - **`convergence`**: The [`convergence::ConvergenceSample`] record emitted
//!   by the external simulator, the session-scoped sample history, and the
//!   four-criterion convergence evaluator.
//! - **`error`**: The custom [`error::FaultTreeError`] enum for centralized
//!   error handling across the crate.
//! - **`export`**: Identifier sanitization, the cycle-tolerant topological
//!   gate ordering, and assembly of the definition statements handed to the
//!   external simulator.
//! - **`model`**: The fault-tree graph itself (base events, gates, and
//!   connections) and the invariant-preserving mutation engine.
//! - **`numeric`**: Shared numeric-safety helpers; no NaN or infinity ever
//!   leaves a public API of this crate.
//! - **`session`**: [`session::AnalysisSession`], the single owner of the
//!   current model snapshot and the live sample stream.

pub mod config;
pub mod convergence;
pub mod error;
pub mod export;
pub mod model;
pub mod numeric;
pub mod session;

pub use error::{AppResult, FaultTreeError};
pub use model::{BaseEvent, Connection, Distribution, FaultTreeModel, Gate, GateKind};
