//! In-memory implementations of the capability interfaces.
//!
//! Useful for tests and for wrapping functional models: the repository serves
//! a fixed schema and scenario catalog, and the runner evaluates a plain
//! function over the merged input mapping.

use chrono::Utc;
use tracing::{debug, info};

use whatif_shared::errors::{RunnerError, RunnerResult};
use whatif_shared::{
    FieldMap, InputField, ModelSchema, OutputField, OutputMap, ScenarioDefinition,
    ScenarioResult,
};

use crate::scenario::ports::{ModelRepository, ScenarioRunner};

/// Model function evaluated by [`FunctionalScenarioRunner`]
pub type ModelFn = Box<dyn Fn(&FieldMap) -> RunnerResult<OutputMap> + Send + Sync>;

/// A fully in-memory model repository
#[derive(Debug, Clone)]
pub struct InMemoryModelRepository {
    schema: ModelSchema,
    scenarios: Vec<ScenarioDefinition>,
}

impl InMemoryModelRepository {
    pub fn new(schema: ModelSchema, scenarios: Vec<ScenarioDefinition>) -> Self {
        Self { schema, scenarios }
    }

    /// Merge additional scenarios into the catalog.
    ///
    /// A scenario whose name already exists replaces the existing definition in
    /// place; new names are appended in the order given.
    pub fn with_extra_scenarios(mut self, extra: Vec<ScenarioDefinition>) -> Self {
        for scenario in extra {
            match self.scenarios.iter_mut().find(|s| s.name == scenario.name) {
                Some(existing) => {
                    debug!("Scenario '{}' overrides built-in definition", scenario.name);
                    *existing = scenario;
                }
                None => self.scenarios.push(scenario),
            }
        }
        self
    }
}

impl ModelRepository for InMemoryModelRepository {
    fn scenarios(&self) -> Vec<ScenarioDefinition> {
        self.scenarios.clone()
    }

    fn schema(&self) -> ModelSchema {
        self.schema.clone()
    }

    fn inputs(&self) -> Vec<InputField> {
        self.schema.inputs.clone()
    }
}

/// A scenario runner that delegates to a model function.
///
/// ```ignore
/// let runner = FunctionalScenarioRunner::new(
///     my_model,
///     FieldMap::from([("rate".to_string(), 5.0)]),
/// );
/// ```
pub struct FunctionalScenarioRunner {
    model_fn: ModelFn,
    base_inputs: FieldMap,
}

impl FunctionalScenarioRunner {
    pub fn new<F>(model_fn: F, base_inputs: FieldMap) -> Self
    where
        F: Fn(&FieldMap) -> RunnerResult<OutputMap> + Send + Sync + 'static,
    {
        Self {
            model_fn: Box::new(model_fn),
            base_inputs,
        }
    }

    pub fn base_inputs(&self) -> &FieldMap {
        &self.base_inputs
    }
}

impl ScenarioRunner for FunctionalScenarioRunner {
    fn run(
        &self,
        scenario: &ScenarioDefinition,
        extra_overrides: &FieldMap,
    ) -> RunnerResult<ScenarioResult> {
        let mut inputs = self.base_inputs.clone();
        inputs.extend(scenario.overrides.iter().map(|(k, v)| (k.clone(), *v)));
        inputs.extend(extra_overrides.iter().map(|(k, v)| (k.clone(), *v)));

        let outputs = (self.model_fn)(&inputs).map_err(|e| e.with_scenario(&scenario.name))?;

        let mut overrides_applied = scenario.overrides.clone();
        overrides_applied.extend(extra_overrides.iter().map(|(k, v)| (k.clone(), *v)));

        Ok(ScenarioResult {
            scenario_name: scenario.name.clone(),
            inputs_used: inputs,
            outputs,
            overrides_applied,
            run_at: Utc::now(),
        })
    }
}

/// Fetch a required input, reporting it as missing otherwise
pub fn require_input(inputs: &FieldMap, field: &str) -> RunnerResult<f64> {
    inputs
        .get(field)
        .copied()
        .ok_or_else(|| RunnerError::missing_input(field))
}

/// Placeholder wiring used when no real model is configured
pub fn stub_wiring() -> (InMemoryModelRepository, FunctionalScenarioRunner) {
    info!("No model configured, using stub wiring");

    let schema = ModelSchema {
        name: "Stub Model".to_string(),
        description: "No model has been configured. \
                      Wire a real ModelRepository and ScenarioRunner in your entry point."
            .to_string(),
        inputs: vec![],
        outputs: vec![OutputField::new(
            "stub",
            "Placeholder output.",
            "",
            "Replace this model with a real implementation.",
        )],
        assumptions: vec!["This is a stub.".to_string()],
        caveats: vec!["Wire a real model before use.".to_string()],
    };
    let scenarios = vec![ScenarioDefinition::new(
        "base",
        "Stub base case.",
        "Stub, no real stress applied.",
    )];

    let runner = FunctionalScenarioRunner::new(
        |_: &FieldMap| {
            Ok(OutputMap::from([
                ("stub".to_string(), true.into()),
                ("message".to_string(), "No model configured.".into()),
            ]))
        },
        FieldMap::new(),
    );

    (InMemoryModelRepository::new(schema, scenarios), runner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use whatif_shared::FieldValue;

    fn linear_runner() -> FunctionalScenarioRunner {
        FunctionalScenarioRunner::new(
            |inputs: &FieldMap| {
                let rate = require_input(inputs, "rate")?;
                Ok(OutputMap::from([(
                    "value".to_string(),
                    FieldValue::Number(100.0 - (rate - 5.0) * 6.5),
                )]))
            },
            FieldMap::from([("rate".to_string(), 5.0), ("spread".to_string(), 1.2)]),
        )
    }

    #[test]
    fn test_merge_order_base_scenario_extra() {
        let runner = linear_runner();
        let scenario = ScenarioDefinition::new("stress", "Stress", "Rates up")
            .with_override("rate", 6.0)
            .with_override("spread", 2.0);
        let extra = FieldMap::from([("spread".to_string(), 3.0)]);

        let result = runner.run(&scenario, &extra).unwrap();

        assert_eq!(result.scenario_name, "stress");
        assert_eq!(result.inputs_used["rate"], 6.0);
        assert_eq!(result.inputs_used["spread"], 3.0);
        assert_eq!(result.output_number("value"), Some(93.5));
        assert_eq!(result.overrides_applied.len(), 2);
        assert_eq!(result.overrides_applied["rate"], 6.0);
        assert_eq!(result.overrides_applied["spread"], 3.0);
    }

    #[test]
    fn test_base_inputs_are_not_reported_as_overrides() {
        let runner = linear_runner();
        let scenario = ScenarioDefinition::new("base", "Base", "None");

        let result = runner.run(&scenario, &FieldMap::new()).unwrap();

        assert!(result.overrides_applied.is_empty());
        assert_eq!(result.inputs_used.len(), 2);
        assert_eq!(result.output_number("value"), Some(100.0));
    }

    #[test]
    fn test_missing_input_names_scenario() {
        let runner = FunctionalScenarioRunner::new(
            |inputs: &FieldMap| {
                require_input(inputs, "volatility")?;
                Ok(OutputMap::new())
            },
            FieldMap::new(),
        );
        let scenario = ScenarioDefinition::new("vol_spike", "", "");

        let err = runner.run(&scenario, &FieldMap::new()).unwrap_err();
        assert_eq!(
            err,
            RunnerError::MissingInput {
                scenario: "vol_spike".to_string(),
                field: "volatility".to_string(),
            }
        );
    }

    #[test]
    fn test_repository_extra_scenarios_replace_and_append() {
        let (repository, _) = stub_wiring();
        let repository = repository.with_extra_scenarios(vec![
            ScenarioDefinition::new("base", "File base", "From file").with_override("x", 1.0),
            ScenarioDefinition::new("extra", "Extra", "From file"),
        ]);

        let scenarios = repository.scenarios();
        let names: Vec<&str> = scenarios.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["base", "extra"]);
        assert_eq!(scenarios[0].description, "File base");
    }

    #[test]
    fn test_stub_wiring_runs() {
        let (repository, runner) = stub_wiring();
        let scenario = &repository.scenarios()[0];

        let result = runner.run(scenario, &FieldMap::new()).unwrap();
        assert_eq!(result.outputs["stub"], FieldValue::Bool(true));
        assert_eq!(
            result.outputs["message"],
            FieldValue::from("No model configured.")
        );
        assert!(repository.inputs().is_empty());
    }
}
