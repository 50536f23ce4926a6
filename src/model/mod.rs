//! The fault-tree graph model and its mutation engine.
//!
//! A model snapshot ([`FaultTreeModel`]) is a plain value: base events, gates,
//! and the connection set that encodes every edge exactly once. Gate input
//! lists are derived from connections on read, so the two views can never
//! diverge. Mutations are copy-on-write; see [`mutation`].

pub mod distribution;
pub mod element;
pub mod mutation;
pub mod tree;

pub use distribution::Distribution;
pub use element::{
    new_uid, BaseEvent, Connection, ConnectionRole, ElementId, Gate, GateKind, Position,
};
pub use mutation::{EventParams, GateParams};
pub use tree::FaultTreeModel;
