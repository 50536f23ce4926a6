//! Integration tests for the export pipeline: ordering, top-event
//! resolution, sanitization, and the rendered definition text.

use dft_core::config::Settings;
use dft_core::export::{gate_emission_order, resolve_top_event, ExportPlan, TopEventSource};
use dft_core::model::{EventParams, GateParams};
use dft_core::session::AnalysisSession;
use dft_core::{FaultTreeModel, GateKind};

fn event_named(name: &str) -> EventParams {
    EventParams {
        name: Some(name.to_string()),
        ..EventParams::default()
    }
}

fn gate_named(name: &str) -> GateParams {
    GateParams {
        name: Some(name.to_string()),
        ..GateParams::default()
    }
}

#[test]
fn test_order_is_valid_for_a_layered_tree() {
    // Build bottom-up references with top-down creation order so a correct
    // result cannot come from stored order alone.
    let model = FaultTreeModel::new();
    let (model, top) = model.add_gate(GateKind::Or, gate_named("system down"));
    let (model, left) = model.add_gate(GateKind::And, gate_named("left branch"));
    let (model, right) = model.add_gate(GateKind::Pand, gate_named("right branch"));
    let (model, e1) = model.add_event(event_named("sensor"));
    let (model, e2) = model.add_event(event_named("actuator"));
    let model = model.connect(&left, &top);
    let model = model.connect(&right, &top);
    let model = model.connect(&e1, &left);
    let model = model.connect(&e2, &right);

    let order = gate_emission_order(&model);
    assert_eq!(order.len(), 3);
    let position = |id: &str| order.iter().position(|g| g == id).unwrap();
    assert!(position(&left) < position(&top));
    assert!(position(&right) < position(&top));
}

#[test]
fn test_mutual_cycle_is_tolerated() {
    // Surface the dropped-back-edge warnings when running with --nocapture.
    let _ = tracing_subscriber::fmt()
        .with_env_filter("dft_core=debug")
        .try_init();

    let model = FaultTreeModel::new();
    let (model, a) = model.add_gate(GateKind::And, gate_named("a"));
    let (model, b) = model.add_gate(GateKind::Or, gate_named("b"));
    let model = model.connect(&a, &b);
    let model = model.connect(&b, &a);

    let order = gate_emission_order(&model);
    assert_eq!(order.len(), 2);
    assert!(order.contains(&a));
    assert!(order.contains(&b));

    // The cycle also defeats sink detection; resolution still succeeds and
    // reports the ambiguity.
    let resolution = resolve_top_event(&model).unwrap();
    assert!(resolution.is_ambiguous());
    assert_eq!(resolution.gate_id, a);
}

#[test]
fn test_full_session_export_round() {
    let mut session = AnalysisSession::new(Settings::default());
    let pump = session.add_event(event_named("Pump #1 (main)"));
    let spare = session.add_event(event_named("Pump #2 (spare)"));
    let gate = session.add_gate(GateKind::Spare, gate_named("pumping function"));
    session.connect(&pump, &gate);
    session.connect_secondary(&spare, &gate);

    let plan = session.export_plan();
    assert_eq!(
        plan.top_event.as_ref().map(|t| &t.source),
        Some(&TopEventSource::UniqueSink)
    );
    assert_eq!(plan.goal.as_deref(), Some("pumping_function"));

    let text = plan.render();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Pump_1_main = exponential(0.001)");
    assert_eq!(lines[1], "Pump_2_spare = exponential(0.001)");
    assert_eq!(lines[2], "pumping_function = SPARE(Pump_1_main | Pump_2_spare)");
    assert_eq!(lines[3], "missiontime = 1000");
    assert_eq!(lines[4], "goal = pumping_function");
}

#[test]
fn test_declared_top_event_overrides_sink_detection() {
    let model = FaultTreeModel::new();
    let (model, inner) = model.add_gate(GateKind::And, gate_named("inner"));
    let (model, outer) = model.add_gate(GateKind::Or, gate_named("outer"));
    let model = model.connect(&inner, &outer);
    let model = model.set_top_event(Some(&inner));

    let resolution = resolve_top_event(&model).unwrap();
    assert_eq!(resolution.gate_id, inner);
    assert_eq!(resolution.source, TopEventSource::Declared);
}

#[test]
fn test_export_plan_serializes_to_json() {
    let model = FaultTreeModel::new();
    let (model, _) = model.add_event(event_named("leaf"));
    let (model, _) = model.add_gate(GateKind::And, gate_named("root"));
    let plan = ExportPlan::build(&model, &Settings::default().simulation);

    let json = plan.to_json().unwrap();
    assert!(json.contains("\"mission_time\""));
    assert!(json.contains("root"));
}
