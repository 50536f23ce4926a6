//! Export pipeline for the external reliability simulator.
//!
//! The simulator consumes a textual model: one definition statement per
//! element, every gate strictly after the gates it references, deterministic
//! identifiers, a mission time, and exactly one goal element. This module
//! produces that shape from a model snapshot. The walk tolerates cycles
//! (back edges are dropped, not fatal) because the editor may export a graph
//! the user has not finished untangling.

pub mod identifier;
pub mod order;
pub mod writer;

pub use identifier::sanitize_identifier;
pub use order::{gate_emission_order, resolve_top_event, TopEventResolution, TopEventSource};
pub use writer::{Definition, ExportPlan};
