//! Model elements: base events, gates, and connections.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::distribution::Distribution;

/// Identifier of a model element. Uuid v4, stored as a string.
pub type ElementId = String;

/// Generate a fresh unique element id.
pub fn new_uid() -> ElementId {
    Uuid::new_v4().to_string()
}

/// 2-D diagram position of an element.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A leaf failure event carrying a failure distribution and an optional
/// repair distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseEvent {
    pub id: ElementId,
    pub name: String,
    pub description: Option<String>,
    pub position: Position,
    pub failure: Distribution,
    pub repair: Option<Distribution>,
}

impl BaseEvent {
    /// New event with a fresh id and the default failure distribution.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_uid(),
            name: name.into(),
            description: None,
            position: Position::default(),
            failure: Distribution::default(),
            repair: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn with_failure(mut self, failure: Distribution) -> Self {
        self.failure = failure;
        self
    }

    pub fn with_repair(mut self, repair: Distribution) -> Self {
        self.repair = Some(repair);
        self
    }
}

/// The logical kind of a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateKind {
    And,
    Or,
    /// Priority-AND: inputs must fail in order.
    Pand,
    /// Spare gate: primary input backed by a pool of secondary spares.
    Spare,
    /// Sequence enforcer over its inputs.
    Seq,
    /// Functional dependency: a trigger failing its secondary dependents.
    Fdep,
}

impl GateKind {
    /// Uppercase mnemonic used in definition statements.
    pub fn as_str(&self) -> &'static str {
        match self {
            GateKind::And => "AND",
            GateKind::Or => "OR",
            GateKind::Pand => "PAND",
            GateKind::Spare => "SPARE",
            GateKind::Seq => "SEQ",
            GateKind::Fdep => "FDEP",
        }
    }

    /// Whether this gate kind accepts secondary inputs.
    pub fn accepts_secondary_inputs(&self) -> bool {
        matches!(self, GateKind::Spare | GateKind::Fdep)
    }
}

impl std::fmt::Display for GateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A logical combination element.
///
/// Gates do not store their input lists. Inputs are derived from the
/// connection set by [`super::tree::FaultTreeModel::gate_inputs`], so the
/// stored edges have exactly one representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    pub id: ElementId,
    pub name: String,
    pub kind: GateKind,
    pub is_top_event: bool,
    pub is_failure_gate: bool,
    pub position: Position,
}

impl Gate {
    pub fn new(kind: GateKind, name: impl Into<String>) -> Self {
        Self {
            id: new_uid(),
            name: name.into(),
            kind,
            is_top_event: false,
            is_failure_gate: false,
            position: Position::default(),
        }
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn with_failure_flag(mut self, is_failure_gate: bool) -> Self {
        self.is_failure_gate = is_failure_gate;
        self
    }
}

/// Role of a connection into its target gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionRole {
    /// Ordinary gate input.
    Primary,
    /// Spare-pool or dependent input; only meaningful for SPARE/FDEP gates.
    Secondary,
}

/// A directed edge from an event or gate into a gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ElementId,
    pub source: ElementId,
    pub target: ElementId,
    pub role: ConnectionRole,
}

impl Connection {
    pub fn new(source: ElementId, target: ElementId, role: ConnectionRole) -> Self {
        Self {
            id: new_uid(),
            source,
            target,
            role,
        }
    }

    /// True when either endpoint names `id`.
    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_builder_defaults() {
        let event = BaseEvent::new("Pump failure").with_position(10.0, 20.0);
        assert_eq!(event.name, "Pump failure");
        assert_eq!(event.failure, Distribution::default());
        assert!(event.repair.is_none());
        assert_eq!(event.position, Position::new(10.0, 20.0));
    }

    #[test]
    fn test_fresh_ids_are_unique() {
        let a = BaseEvent::new("a");
        let b = BaseEvent::new("b");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_only_spare_and_fdep_take_secondary_inputs() {
        assert!(GateKind::Spare.accepts_secondary_inputs());
        assert!(GateKind::Fdep.accepts_secondary_inputs());
        assert!(!GateKind::And.accepts_secondary_inputs());
        assert!(!GateKind::Pand.accepts_secondary_inputs());
    }

    #[test]
    fn test_connection_touches_either_endpoint() {
        let c = Connection::new("src".to_string(), "dst".to_string(), ConnectionRole::Primary);
        assert!(c.touches("src"));
        assert!(c.touches("dst"));
        assert!(!c.touches("other"));
    }
}
