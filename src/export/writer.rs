//! Assembly of the textual model handed to the external simulator.
//!
//! The simulator owns its input language; this crate only guarantees the
//! shape: one definition statement per element, base events first, every gate
//! after the gates it references, a mission-time parameter, and exactly one
//! goal element. The statements here use the minimal `name = KIND(args)`
//! form. Distribution parameters are sanitized through [`crate::numeric`] so
//! a degenerate model never produces `NaN` in the output text.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::config::SimulationSettings;
use crate::model::{Distribution, FaultTreeModel};
use crate::numeric::finite_or;

use super::identifier::sanitize_identifier;
use super::order::{gate_emission_order, resolve_top_event, TopEventResolution};

/// One definition statement of the export text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    /// Sanitized identifier the statement defines.
    pub identifier: String,
    /// The full statement line.
    pub statement: String,
}

/// Everything the external simulator needs, in emission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportPlan {
    /// Base-event definitions, in stored order.
    pub events: Vec<Definition>,
    /// Gate definitions, definitions-before-use.
    pub gates: Vec<Definition>,
    /// Mission time forwarded from the simulation settings.
    pub mission_time: f64,
    /// How the goal element was chosen; `None` only for a model without
    /// gates. Callers should surface `is_ambiguous` resolutions to the user.
    pub top_event: Option<TopEventResolution>,
    /// Sanitized identifier of the goal element.
    pub goal: Option<String>,
}

impl ExportPlan {
    /// Builds the plan for a model snapshot.
    pub fn build(model: &FaultTreeModel, simulation: &SimulationSettings) -> Self {
        let events = model
            .events
            .iter()
            .map(|event| {
                let identifier = sanitize_identifier(&event.name);
                let mut statement =
                    format!("{} = {}", identifier, render_distribution(&event.failure));
                if let Some(repair) = &event.repair {
                    let _ = write!(statement, " repair {}", render_distribution(repair));
                }
                Definition {
                    identifier,
                    statement,
                }
            })
            .collect();

        let gates = gate_emission_order(model)
            .iter()
            .filter_map(|gate_id| model.gate(gate_id))
            .map(|gate| {
                let identifier = sanitize_identifier(&gate.name);
                let primary = input_identifiers(model, &model.gate_inputs(&gate.id));
                let secondary = input_identifiers(model, &model.gate_secondary_inputs(&gate.id));
                let mut args = primary.join(", ");
                if !secondary.is_empty() {
                    let _ = write!(args, " | {}", secondary.join(", "));
                }
                Definition {
                    identifier: identifier.clone(),
                    statement: format!("{} = {}({})", identifier, gate.kind.as_str(), args),
                }
            })
            .collect();

        let top_event = resolve_top_event(model);
        let goal = top_event
            .as_ref()
            .and_then(|top| model.display_name(&top.gate_id))
            .map(sanitize_identifier);

        Self {
            events,
            gates,
            mission_time: finite_or(simulation.mission_time, 0.0),
            top_event,
            goal,
        }
    }

    /// Renders the full export text, one statement per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for definition in self.events.iter().chain(self.gates.iter()) {
            out.push_str(&definition.statement);
            out.push('\n');
        }
        let _ = writeln!(out, "missiontime = {}", self.mission_time);
        if let Some(goal) = &self.goal {
            let _ = writeln!(out, "goal = {}", goal);
        }
        out
    }

    /// Serialize the plan to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn input_identifiers(model: &FaultTreeModel, inputs: &[String]) -> Vec<String> {
    inputs
        .iter()
        .filter_map(|id| model.display_name(id))
        .map(sanitize_identifier)
        .collect()
}

fn render_distribution(distribution: &Distribution) -> String {
    let params: Vec<String> = distribution
        .parameters()
        .into_iter()
        .map(|p| finite_or(p, 0.0).to_string())
        .collect();
    format!("{}({})", distribution.kind_label(), params.join(", "))
}
