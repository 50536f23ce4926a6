//! The fault-tree model snapshot.
//!
//! `FaultTreeModel` is an immutable-by-convention value type. The mutation
//! engine ([`super::mutation`]) never edits a snapshot in place; it computes
//! the next snapshot from the previous one and returns it, so a caller always
//! observes either the old graph or the new one, never a half-applied edit.
//!
//! The connection set is the single source of truth for edges. A gate's input
//! list is derived from it on read, in stored connection order, which makes
//! the "inputs and connections must never diverge" invariant hold by
//! construction. Cycles are allowed; the model deliberately does nothing to
//! prevent them, because an interactive editor must tolerate transiently
//! invalid graphs.

use serde::{Deserialize, Serialize};

use super::element::{BaseEvent, Connection, ConnectionRole, ElementId, Gate};

/// One consistent snapshot of the fault tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaultTreeModel {
    /// Base events in creation order.
    pub events: Vec<BaseEvent>,
    /// Gates in creation order. Stored order is load-bearing: it makes the
    /// export ordering and the top-event fallback deterministic.
    pub gates: Vec<Gate>,
    /// Every edge in the graph, in creation order.
    pub connections: Vec<Connection>,
    /// Explicitly designated top event, if the user has set one.
    pub top_event: Option<ElementId>,
}

impl FaultTreeModel {
    /// An empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of elements (events plus gates).
    pub fn element_count(&self) -> usize {
        self.events.len() + self.gates.len()
    }

    /// True when `id` names an event or a gate in this snapshot.
    pub fn contains(&self, id: &str) -> bool {
        self.is_event(id) || self.is_gate(id)
    }

    /// True when `id` names a base event.
    pub fn is_event(&self, id: &str) -> bool {
        self.events.iter().any(|e| e.id == id)
    }

    /// True when `id` names a gate.
    pub fn is_gate(&self, id: &str) -> bool {
        self.gates.iter().any(|g| g.id == id)
    }

    /// Looks up a base event by id.
    pub fn event(&self, id: &str) -> Option<&BaseEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Looks up a gate by id.
    pub fn gate(&self, id: &str) -> Option<&Gate> {
        self.gates.iter().find(|g| g.id == id)
    }

    /// Looks up a connection by id.
    pub fn connection(&self, id: &str) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    /// Display name of an element, if present.
    pub fn display_name(&self, id: &str) -> Option<&str> {
        self.event(id)
            .map(|e| e.name.as_str())
            .or_else(|| self.gate(id).map(|g| g.name.as_str()))
    }

    /// Primary inputs of a gate, derived from the connection set in stored
    /// connection order. Empty for an unknown id.
    pub fn gate_inputs(&self, gate_id: &str) -> Vec<ElementId> {
        self.inputs_with_role(gate_id, ConnectionRole::Primary)
    }

    /// Secondary (spare-pool / dependent) inputs of a gate.
    pub fn gate_secondary_inputs(&self, gate_id: &str) -> Vec<ElementId> {
        self.inputs_with_role(gate_id, ConnectionRole::Secondary)
    }

    fn inputs_with_role(&self, gate_id: &str, role: ConnectionRole) -> Vec<ElementId> {
        self.connections
            .iter()
            .filter(|c| c.target == gate_id && c.role == role)
            .map(|c| c.source.clone())
            .collect()
    }

    /// All inputs of a gate, primary first, then secondary.
    pub fn gate_all_inputs(&self, gate_id: &str) -> Vec<ElementId> {
        let mut inputs = self.gate_inputs(gate_id);
        inputs.extend(self.gate_secondary_inputs(gate_id));
        inputs
    }

    /// True when some other gate lists `gate_id` among its inputs.
    pub fn is_referenced_as_input(&self, gate_id: &str) -> bool {
        self.connections
            .iter()
            .any(|c| c.source == gate_id && self.is_gate(&c.target))
    }

    /// Serialize the snapshot to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
