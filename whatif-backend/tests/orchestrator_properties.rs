//! Behavioural tests for the scenario orchestrator against a one-input
//! reference model: `value = 100 - (rate - 5) * 6.5`, base rate 5.0, and a
//! "stress" scenario that sets the rate to 6.0.

use whatif_backend::adapters::in_memory::{
    FunctionalScenarioRunner, InMemoryModelRepository, require_input,
};
use whatif_backend::scenario::ScenarioOrchestrator;
use whatif_shared::{
    FieldMap, FieldValue, InputField, ModelSchema, OrchestratorError, OutputField, OutputMap,
    RunnerError, ScenarioDefinition,
};

fn reference_orchestrator() -> ScenarioOrchestrator {
    let schema = ModelSchema {
        name: "Reference".to_string(),
        description: "Linear rate sensitivity".to_string(),
        inputs: vec![
            InputField::new("rate", "rates", "Policy rate", "%", (0.0, 10.0))
                .with_current_value(5.0),
        ],
        outputs: vec![OutputField::new("value", "Portfolio value", "£m", "Higher is better")],
        assumptions: vec![],
        caveats: vec![],
    };
    let scenarios = vec![
        ScenarioDefinition::new("base", "Base", "No stress"),
        ScenarioDefinition::new("stress", "Rates up 100bps", "Tightening").with_override("rate", 6.0),
    ];
    let runner = FunctionalScenarioRunner::new(
        |inputs: &FieldMap| {
            let rate = require_input(inputs, "rate")?;
            Ok(OutputMap::from([(
                "value".to_string(),
                FieldValue::Number(100.0 - (rate - 5.0) * 6.5),
            )]))
        },
        FieldMap::from([("rate".to_string(), 5.0)]),
    );

    ScenarioOrchestrator::new(
        Box::new(runner),
        Box::new(InMemoryModelRepository::new(schema, scenarios)),
    )
}

fn value_of(orchestrator: &mut ScenarioOrchestrator, name: &str, call: Option<f64>) -> f64 {
    let call = call.map(|rate| FieldMap::from([("rate".to_string(), rate)]));
    orchestrator
        .run_scenario(name, call.as_ref())
        .unwrap()
        .output_number("value")
        .unwrap()
}

#[test]
fn test_reference_values() {
    let mut orchestrator = reference_orchestrator();

    assert_eq!(value_of(&mut orchestrator, "base", None), 100.0);
    assert_eq!(value_of(&mut orchestrator, "stress", None), 93.5);
}

#[test]
fn test_session_override_matches_stress_scenario() {
    let mut orchestrator = reference_orchestrator();

    let message = orchestrator.override_input("rates", "rate", 6.0);

    assert_eq!(message, "Override applied: rates.rate = 6.0");
    assert_eq!(value_of(&mut orchestrator, "base", None), 93.5);
    assert_eq!(
        value_of(&mut orchestrator, "base", None),
        value_of(&mut orchestrator, "stress", None)
    );
}

#[test]
fn test_precedence_peels_layer_by_layer() {
    let mut orchestrator = reference_orchestrator();
    orchestrator.override_input("manual", "rate", 7.0);

    // call > session > scenario > base
    assert_eq!(value_of(&mut orchestrator, "stress", Some(8.0)), 80.5);
    assert_eq!(value_of(&mut orchestrator, "stress", None), 87.0);

    orchestrator.reset_overrides();
    assert_eq!(value_of(&mut orchestrator, "stress", None), 93.5);
    assert_eq!(value_of(&mut orchestrator, "base", None), 100.0);
}

#[test]
fn test_override_is_idempotent_per_field() {
    let mut orchestrator = reference_orchestrator();

    orchestrator.override_input("manual", "rate", 6.0);
    orchestrator.override_input("desk", "rate", 7.0);

    let active = orchestrator.active_overrides();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].source, "desk");
    assert_eq!(active[0].value, 7.0);
    assert_eq!(value_of(&mut orchestrator, "base", None), 87.0);
}

#[test]
fn test_reset_is_complete() {
    let mut orchestrator = reference_orchestrator();
    orchestrator.override_input("manual", "rate", 9.0);
    orchestrator.override_input("manual", "unused", 1.0);

    let message = orchestrator.reset_overrides();

    assert_eq!(
        message,
        "Cleared 2 override(s). All inputs restored to model defaults."
    );
    assert!(orchestrator.active_overrides().is_empty());
    let result = orchestrator.run_scenario("base", None).unwrap();
    assert!(result.overrides_applied.is_empty());
    assert_eq!(result.inputs_used["rate"], 5.0);
}

#[test]
fn test_unknown_scenario_message() {
    let mut orchestrator = reference_orchestrator();

    let err = orchestrator.run_scenario("does_not_exist", None).unwrap_err();

    assert_eq!(
        err.to_string(),
        "Unknown scenario 'does_not_exist'. Available: base, stress"
    );
}

#[test]
fn test_comparison_against_reference() {
    let mut orchestrator = reference_orchestrator();

    let comparison = orchestrator
        .compare_scenarios("base", "stress", None)
        .unwrap();

    let difference = &comparison.differences["value"];
    assert_eq!(difference.value_a, Some(FieldValue::Number(100.0)));
    assert_eq!(difference.value_b, Some(FieldValue::Number(93.5)));
    assert_eq!(difference.delta, Some(-6.5));
    assert_eq!(difference.percent_change, Some(-6.5));
    assert_eq!(orchestrator.current_results().len(), 2);
}

#[test]
fn test_session_override_applies_to_both_sides_of_comparison() {
    let mut orchestrator = reference_orchestrator();
    orchestrator.override_input("manual", "rate", 7.0);

    let comparison = orchestrator
        .compare_scenarios("base", "stress", Some(vec!["value".to_string()]))
        .unwrap();

    assert_eq!(comparison.differences["value"].delta, Some(0.0));
}

#[test]
fn test_missing_input_surfaces_unchanged() {
    let mut orchestrator = reference_orchestrator();
    // A repository whose runner has no base rate
    let runner = FunctionalScenarioRunner::new(
        |inputs: &FieldMap| {
            require_input(inputs, "rate")?;
            Ok(OutputMap::new())
        },
        FieldMap::new(),
    );
    let mut bare = ScenarioOrchestrator::new(
        Box::new(runner),
        Box::new(InMemoryModelRepository::new(
            orchestrator.model_schema(),
            orchestrator.available_scenarios(),
        )),
    );

    let err = bare.run_scenario("base", None).unwrap_err();
    assert_eq!(
        err,
        OrchestratorError::Runner(RunnerError::MissingInput {
            scenario: "base".to_string(),
            field: "rate".to_string(),
        })
    );
    assert!(bare.run_scenario("stress", None).is_ok());
    assert!(orchestrator.run_scenario("base", None).is_ok());
}
