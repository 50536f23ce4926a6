//! Analysis session: the single owner of the live model and sample stream.
//!
//! The editing surface, the exporter, and the convergence display all talk to
//! one `AnalysisSession`. It holds the current [`FaultTreeModel`] snapshot and
//! the [`SampleHistory`] for the running simulation; there is no process-wide
//! "current results" state anywhere in this crate.
//!
//! Mutations are copy-on-write: each command computes the next snapshot
//! against the stable current one and then replaces it, so a command either
//! fully applies or leaves the model untouched. The snapshot handed back to
//! the caller is always complete and consistent.

use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::convergence::{evaluate, ConvergenceReport, ConvergenceSample, SampleHistory, STABILITY_WINDOW};
use crate::export::ExportPlan;
use crate::model::{ElementId, EventParams, FaultTreeModel, GateKind, GateParams};

/// One editing-and-simulation session over a fault tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisSession {
    settings: Settings,
    model: FaultTreeModel,
    history: SampleHistory,
}

impl AnalysisSession {
    /// Fresh session with an empty model.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            model: FaultTreeModel::new(),
            history: SampleHistory::new(),
        }
    }

    /// Session resuming work on an existing model.
    pub fn with_model(settings: Settings, model: FaultTreeModel) -> Self {
        Self {
            settings,
            model,
            history: SampleHistory::new(),
        }
    }

    /// The current model snapshot.
    pub fn model(&self) -> &FaultTreeModel {
        &self.model
    }

    /// The session settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The sample stream of the current run.
    pub fn history(&self) -> &SampleHistory {
        &self.history
    }

    /// Adds a base event; returns its id.
    pub fn add_event(&mut self, params: EventParams) -> ElementId {
        let (next, id) = self.model.add_event(params);
        self.model = next;
        id
    }

    /// Adds a gate; returns its id.
    pub fn add_gate(&mut self, kind: GateKind, params: GateParams) -> ElementId {
        let (next, id) = self.model.add_gate(kind, params);
        self.model = next;
        id
    }

    /// Connects `source` into `target` as a primary input.
    pub fn connect(&mut self, source: &str, target: &str) -> &FaultTreeModel {
        self.model = self.model.connect(source, target);
        &self.model
    }

    /// Connects `source` into `target` as a secondary input.
    pub fn connect_secondary(&mut self, source: &str, target: &str) -> &FaultTreeModel {
        self.model = self.model.connect_secondary(source, target);
        &self.model
    }

    /// Deletes a connection by id.
    pub fn delete_connection(&mut self, connection_id: &str) -> &FaultTreeModel {
        self.model = self.model.delete_connection(connection_id);
        &self.model
    }

    /// Deletes an element by id, cascading for gates.
    pub fn delete_element(&mut self, id: &str) -> &FaultTreeModel {
        self.model = self.model.delete_element(id);
        &self.model
    }

    /// Designates or clears the top event.
    pub fn set_top_event(&mut self, gate_id: Option<&str>) -> &FaultTreeModel {
        self.model = self.model.set_top_event(gate_id);
        &self.model
    }

    /// Lays the diagram out on the configured grid.
    pub fn reorganize(&mut self) -> &FaultTreeModel {
        self.model = self.model.reorganize(&self.settings.layout);
        &self.model
    }

    /// Builds the export plan for the current snapshot.
    pub fn export_plan(&self) -> ExportPlan {
        ExportPlan::build(&self.model, &self.settings.simulation)
    }

    /// Starts a new simulation run, dropping any previous sample stream.
    pub fn begin_run(&mut self) {
        self.history.clear();
    }

    /// Feeds one simulator sample into the session and evaluates it.
    ///
    /// Out-of-order samples are dropped by the history but still evaluated,
    /// so the caller always gets a report for display. A stream that ends
    /// before convergence simply leaves the last report "in progress"; that
    /// is a valid final answer, not an error.
    pub fn record_sample(&mut self, sample: ConvergenceSample) -> ConvergenceReport {
        self.history.push(sample.clone());
        let window = self.history.trailing_means(STABILITY_WINDOW);
        evaluate(&sample, &window, self.settings.simulation.max_iterations)
    }

    /// Evaluation of the latest recorded sample, if any.
    pub fn latest_report(&self) -> Option<ConvergenceReport> {
        let latest = self.history.latest()?;
        let window = self.history.trailing_means(STABILITY_WINDOW);
        Some(evaluate(
            latest,
            &window,
            self.settings.simulation.max_iterations,
        ))
    }
}
