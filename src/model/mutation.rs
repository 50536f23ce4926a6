//! Copy-on-write mutation operations over [`FaultTreeModel`].
//!
//! Every operation takes the current snapshot by reference and returns the
//! next snapshot. An operation whose precondition fails (an unknown id, a
//! duplicate edge, a role the target gate cannot accept) returns an unchanged
//! copy instead of erroring: the editing surface keeps issuing commands
//! against whatever graph the user has built, valid or not, and the model
//! must never end up referencing a nonexistent id.
//!
//! Deleting a gate cascades: the gate roots a sub-expression, and removing it
//! removes every element transitively reachable through its inputs, the same
//! way deleting a node in an expression graph deletes the sub-tree under it.
//! A visited set bounds the traversal on cyclic graphs; revisiting an id
//! stops that branch rather than aborting the delete.

use std::collections::HashSet;

use tracing::debug;

use crate::config::LayoutSettings;

use super::distribution::Distribution;
use super::element::{BaseEvent, Connection, ConnectionRole, ElementId, Gate, GateKind, Position};
use super::tree::FaultTreeModel;

/// Optional parameters for [`FaultTreeModel::add_event`].
#[derive(Debug, Clone, Default)]
pub struct EventParams {
    /// Display name; auto-numbered when absent.
    pub name: Option<String>,
    pub description: Option<String>,
    pub position: Option<Position>,
    /// Failure distribution; exponential by default.
    pub failure: Option<Distribution>,
    pub repair: Option<Distribution>,
}

/// Optional parameters for [`FaultTreeModel::add_gate`].
#[derive(Debug, Clone, Default)]
pub struct GateParams {
    /// Display name; auto-numbered when absent.
    pub name: Option<String>,
    pub position: Option<Position>,
    pub is_failure_gate: bool,
}

impl FaultTreeModel {
    /// Adds a base event with a fresh id and returns the new snapshot along
    /// with the id.
    pub fn add_event(&self, params: EventParams) -> (Self, ElementId) {
        let mut next = self.clone();
        let name = params
            .name
            .unwrap_or_else(|| format!("Basic Event {}", self.events.len() + 1));
        let mut event = BaseEvent::new(name);
        if let Some(description) = params.description {
            event.description = Some(description);
        }
        if let Some(position) = params.position {
            event.position = position;
        }
        if let Some(failure) = params.failure {
            event.failure = failure;
        }
        event.repair = params.repair;
        let id = event.id.clone();
        next.events.push(event);
        (next, id)
    }

    /// Adds a gate of `kind` with a fresh id and no inputs.
    pub fn add_gate(&self, kind: GateKind, params: GateParams) -> (Self, ElementId) {
        let mut next = self.clone();
        let name = params
            .name
            .unwrap_or_else(|| format!("Gate {}", self.gates.len() + 1));
        let mut gate = Gate::new(kind, name);
        if let Some(position) = params.position {
            gate.position = position;
        }
        gate.is_failure_gate = params.is_failure_gate;
        let id = gate.id.clone();
        next.gates.push(gate);
        (next, id)
    }

    /// Connects `source` into `target` as a primary input.
    ///
    /// No-op when either id is unknown, the target is not a gate, or the
    /// edge already exists. Duplicates are rejected silently.
    pub fn connect(&self, source: &str, target: &str) -> Self {
        self.connect_with_role(source, target, ConnectionRole::Primary)
    }

    /// Connects `source` into `target` as a secondary input.
    ///
    /// Secondary inputs are the spare pool of a SPARE gate and the dependent
    /// set of an FDEP gate; for any other target kind this is a no-op.
    pub fn connect_secondary(&self, source: &str, target: &str) -> Self {
        match self.gate(target) {
            Some(gate) if gate.kind.accepts_secondary_inputs() => {
                self.connect_with_role(source, target, ConnectionRole::Secondary)
            }
            _ => {
                debug!(source, target, "secondary connect ignored: target does not take secondary inputs");
                self.clone()
            }
        }
    }

    fn connect_with_role(&self, source: &str, target: &str, role: ConnectionRole) -> Self {
        if !self.contains(source) {
            debug!(source, target, "connect ignored: unknown source id");
            return self.clone();
        }
        if !self.is_gate(target) {
            debug!(source, target, "connect ignored: target is not a gate");
            return self.clone();
        }
        let duplicate = self
            .connections
            .iter()
            .any(|c| c.source == source && c.target == target && c.role == role);
        if duplicate {
            debug!(source, target, "connect ignored: edge already present");
            return self.clone();
        }
        let mut next = self.clone();
        next.connections.push(Connection::new(
            source.to_string(),
            target.to_string(),
            role,
        ));
        next
    }

    /// Removes a connection by id. Unknown ids are a no-op.
    pub fn delete_connection(&self, connection_id: &str) -> Self {
        let mut next = self.clone();
        next.connections.retain(|c| c.id != connection_id);
        next
    }

    /// Deletes an element by id.
    ///
    /// Unknown ids are a no-op, so repeated deletes are idempotent. Deleting
    /// a base event removes the event and every connection touching it.
    /// Deleting a gate removes the whole sub-expression rooted at it: the
    /// gate, every element transitively reachable through its inputs, and
    /// every connection touching any removed id.
    pub fn delete_element(&self, id: &str) -> Self {
        if self.is_event(id) {
            let mut next = self.clone();
            next.events.retain(|e| e.id != id);
            next.connections.retain(|c| !c.touches(id));
            return next;
        }
        if self.is_gate(id) {
            let removed = self.reachable_from_gate(id);
            let mut next = self.clone();
            next.events.retain(|e| !removed.contains(e.id.as_str()));
            next.gates.retain(|g| !removed.contains(g.id.as_str()));
            next.connections
                .retain(|c| !removed.contains(c.source.as_str()) && !removed.contains(c.target.as_str()));
            if next
                .top_event
                .as_deref()
                .is_some_and(|top| removed.contains(top))
            {
                next.top_event = None;
            }
            return next;
        }
        debug!(id, "delete ignored: id not present in model");
        self.clone()
    }

    /// Ids removed by deleting the gate `root`: the gate itself plus
    /// everything transitively referenced through gate inputs. The visited
    /// set stops traversal along revisited edges, so cycles terminate.
    fn reachable_from_gate(&self, root: &str) -> HashSet<ElementId> {
        let mut visited: HashSet<ElementId> = HashSet::new();
        let mut stack: Vec<ElementId> = vec![root.to_string()];
        while let Some(id) = stack.pop() {
            if !visited.insert(id.clone()) {
                continue;
            }
            if self.is_gate(&id) {
                for input in self.gate_all_inputs(&id) {
                    if !visited.contains(&input) {
                        stack.push(input);
                    }
                }
            }
        }
        visited
    }

    /// Designates `gate_id` as the top event, or clears the designation when
    /// `None`. A non-gate id is a no-op. The gates' `is_top_event` flags are
    /// kept in sync within the same snapshot.
    pub fn set_top_event(&self, gate_id: Option<&str>) -> Self {
        if let Some(id) = gate_id {
            if !self.is_gate(id) {
                debug!(id, "set_top_event ignored: id is not a gate");
                return self.clone();
            }
        }
        let mut next = self.clone();
        next.top_event = gate_id.map(str::to_string);
        for gate in &mut next.gates {
            gate.is_top_event = gate_id == Some(gate.id.as_str());
        }
        next
    }

    /// Pure layout transform: places all elements on a centered grid.
    ///
    /// With `n` elements, `cols = ceil(sqrt(n))` and `rows = ceil(n / cols)`.
    /// Events come first in stored order, then gates. No relationship is
    /// touched, only positions.
    pub fn reorganize(&self, layout: &LayoutSettings) -> Self {
        let n = self.element_count();
        if n == 0 {
            return self.clone();
        }
        let cols = (n as f64).sqrt().ceil() as usize;
        let rows = n.div_ceil(cols);
        let spacing = layout.grid_spacing;
        let x0 = layout.origin_x - (cols.saturating_sub(1)) as f64 * spacing / 2.0;
        let y0 = layout.origin_y - (rows.saturating_sub(1)) as f64 * spacing / 2.0;

        let mut next = self.clone();
        let positions = (0..n).map(|i| {
            let col = i % cols;
            let row = i / cols;
            Position::new(x0 + col as f64 * spacing, y0 + row as f64 * spacing)
        });
        for (element, position) in next
            .events
            .iter_mut()
            .map(|e| &mut e.position)
            .chain(next.gates.iter_mut().map(|g| &mut g.position))
            .zip(positions)
        {
            *element = position;
        }
        next
    }
}
