//! Cycle-tolerant topological ordering of gates, plus top-event resolution.
//!
//! The emission order is a classic three-color depth-first search over the
//! gate dependency graph: an edge A → B exists when gate B appears among gate
//! A's inputs. A gate is unvisited, in progress (gray), or done (black). An
//! edge into a gray gate closes a cycle; the walk drops that edge and keeps
//! going, so the search terminates on any graph and every gate is emitted
//! exactly once. Iterating the gates in stored order makes the result
//! deterministic and covers gates unreachable from any root.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model::{ElementId, FaultTreeModel};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Gate ids in a definitions-before-use order.
///
/// Every gate referenced by another gate's inputs appears strictly before
/// its referrer, except along dropped back edges. The output always contains
/// every gate of the model exactly once.
pub fn gate_emission_order(model: &FaultTreeModel) -> Vec<ElementId> {
    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut output: Vec<ElementId> = Vec::with_capacity(model.gates.len());
    for gate in &model.gates {
        visit(model, &gate.id, &mut marks, &mut output);
    }
    output
}

fn visit<'a>(
    model: &'a FaultTreeModel,
    gate_id: &'a str,
    marks: &mut HashMap<&'a str, Mark>,
    output: &mut Vec<ElementId>,
) {
    if marks.contains_key(gate_id) {
        return;
    }
    marks.insert(gate_id, Mark::InProgress);
    for input in model.gate_all_inputs(gate_id) {
        let Some(input_gate) = model.gate(&input) else {
            // Base events carry no dependencies of their own.
            continue;
        };
        match marks.get(input_gate.id.as_str()) {
            Some(Mark::Done) => {}
            Some(Mark::InProgress) => {
                warn!(
                    from = gate_id,
                    to = input_gate.id.as_str(),
                    "cycle detected in gate dependencies; dropping back edge"
                );
            }
            None => visit(model, input_gate.id.as_str(), marks, output),
        }
    }
    marks.insert(gate_id, Mark::Done);
    output.push(gate_id.to_string());
}

/// How the exported top event was determined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum TopEventSource {
    /// The model declares a top event and it resolves to a gate.
    Declared,
    /// Exactly one gate is not referenced as an input by any other gate.
    UniqueSink,
    /// Zero or several sink gates; fell back to the first gate in stored
    /// order. The competing candidates are recorded for the caller to
    /// surface.
    AmbiguousFallback { candidates: Vec<ElementId> },
}

/// Resolved top event for an export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopEventResolution {
    /// The gate chosen as the overall goal element.
    pub gate_id: ElementId,
    /// Provenance of the choice, including any ambiguity.
    pub source: TopEventSource,
}

impl TopEventResolution {
    /// True when the resolution fell back past an ambiguity.
    pub fn is_ambiguous(&self) -> bool {
        matches!(self.source, TopEventSource::AmbiguousFallback { .. })
    }
}

/// Resolves the gate to designate as the simulation goal.
///
/// A declared top event wins. Otherwise the unique dependency sink is used.
/// With zero or several sinks the first gate in stored order is chosen and
/// the ambiguity is flagged rather than hidden; the fallback itself is
/// arbitrary. Returns `None` only for a model without gates.
pub fn resolve_top_event(model: &FaultTreeModel) -> Option<TopEventResolution> {
    if let Some(declared) = model.top_event.as_deref() {
        if model.is_gate(declared) {
            return Some(TopEventResolution {
                gate_id: declared.to_string(),
                source: TopEventSource::Declared,
            });
        }
        debug!(declared, "declared top event is not a gate; falling back to sink detection");
    }

    let first_gate = model.gates.first()?;
    let sinks: Vec<ElementId> = model
        .gates
        .iter()
        .filter(|g| !model.is_referenced_as_input(&g.id))
        .map(|g| g.id.clone())
        .collect();

    if sinks.len() == 1 {
        return Some(TopEventResolution {
            gate_id: sinks[0].clone(),
            source: TopEventSource::UniqueSink,
        });
    }

    warn!(
        sink_count = sinks.len(),
        "top event resolution is ambiguous; falling back to first gate in stored order"
    );
    Some(TopEventResolution {
        gate_id: first_gate.id.clone(),
        source: TopEventSource::AmbiguousFallback { candidates: sinks },
    })
}
