//! Scenario Orchestrator - session state for what-if analysis.
//!
//! The orchestrator owns the session override store and the per-scenario
//! result cache, resolves override precedence, and delegates execution to a
//! [`ScenarioRunner`] and metadata to a [`ModelRepository`]. One instance
//! serves one session; it is not shared between sessions.
//!
//! Precedence, highest first: call overrides, session overrides, scenario
//! overrides, base inputs. The orchestrator merges the session and call layers;
//! the runner layers that mapping over its base inputs and the scenario.

use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

use whatif_shared::errors::{OrchestratorError, OrchestratorResult};
use whatif_shared::{
    FieldMap, InputField, ModelSchema, Override, ScenarioComparison, ScenarioDefinition,
    ScenarioResult,
};

use super::comparison::compare_results;
use super::overrides::OverrideStore;
use super::ports::{ModelRepository, ScenarioRunner};

pub struct ScenarioOrchestrator {
    runner: Box<dyn ScenarioRunner>,
    repository: Box<dyn ModelRepository>,
    overrides: OverrideStore,
    last_results: BTreeMap<String, ScenarioResult>,
}

impl ScenarioOrchestrator {
    pub fn new(runner: Box<dyn ScenarioRunner>, repository: Box<dyn ModelRepository>) -> Self {
        let schema = repository.schema();
        info!(
            "Initializing ScenarioOrchestrator for model '{}' ({} scenarios)",
            schema.name,
            repository.scenarios().len()
        );

        Self {
            runner,
            repository,
            overrides: OverrideStore::new(),
            last_results: BTreeMap::new(),
        }
    }

    /// All configured scenarios with their descriptions
    pub fn available_scenarios(&self) -> Vec<ScenarioDefinition> {
        self.repository.scenarios()
    }

    /// Most recent result for each scenario run this session
    pub fn current_results(&self) -> BTreeMap<String, ScenarioResult> {
        self.last_results.clone()
    }

    pub fn model_schema(&self) -> ModelSchema {
        self.repository.schema()
    }

    pub fn model_inputs(&self) -> Vec<InputField> {
        self.repository.inputs()
    }

    /// Active session overrides in last-applied order
    pub fn active_overrides(&self) -> Vec<Override> {
        self.overrides.entries().to_vec()
    }

    /// Run a named scenario with the active session overrides plus any
    /// call-specific overrides, and cache the result under the scenario name.
    ///
    /// On failure neither the cache nor the override store is touched.
    #[instrument(skip(self, call_overrides))]
    pub fn run_scenario(
        &mut self,
        name: &str,
        call_overrides: Option<&FieldMap>,
    ) -> OrchestratorResult<ScenarioResult> {
        let scenario = self.resolve_scenario(name)?;

        let mut combined = self.overrides.to_field_map();
        if let Some(call_overrides) = call_overrides {
            combined.extend(call_overrides.iter().map(|(k, v)| (k.clone(), *v)));
        }

        debug!(
            "Running scenario '{}' with {} extra override(s)",
            name,
            combined.len()
        );

        let result = self.runner.run(&scenario, &combined).map_err(|e| {
            warn!("Scenario '{}' failed: {}", name, e);
            OrchestratorError::from(e)
        })?;

        self.last_results.insert(name.to_string(), result.clone());
        info!("Scenario '{}' completed", name);
        Ok(result)
    }

    /// Apply a session-level override, replacing any existing override for the field
    #[instrument(skip(self))]
    pub fn override_input(&mut self, source: &str, field: &str, value: f64) -> String {
        self.overrides.apply(source, field, value);
        info!("Session override set: {}.{} = {}", source, field, value);
        format!("Override applied: {}.{} = {:?}", source, field, value)
    }

    /// Clear all session overrides. Cached results are kept.
    #[instrument(skip(self))]
    pub fn reset_overrides(&mut self) -> String {
        let count = self.overrides.clear();
        info!("Cleared {} session override(s)", count);
        format!(
            "Cleared {} override(s). All inputs restored to model defaults.",
            count
        )
    }

    /// Run both scenarios (refreshing their cache entries) and compare them.
    ///
    /// Without an explicit metric list, every output present on either side is
    /// compared in sorted order.
    #[instrument(skip(self, metrics))]
    pub fn compare_scenarios(
        &mut self,
        scenario_a: &str,
        scenario_b: &str,
        metrics: Option<Vec<String>>,
    ) -> OrchestratorResult<ScenarioComparison> {
        let result_a = self.run_scenario(scenario_a, None)?;
        let result_b = self.run_scenario(scenario_b, None)?;

        let comparison = compare_results(result_a, result_b, metrics);
        debug!(
            "Compared '{}' vs '{}' on {} metric(s)",
            scenario_a,
            scenario_b,
            comparison.metrics.len()
        );
        Ok(comparison)
    }

    fn resolve_scenario(&self, name: &str) -> OrchestratorResult<ScenarioDefinition> {
        let scenarios = self.repository.scenarios();
        let available: Vec<String> = scenarios.iter().map(|s| s.name.clone()).collect();

        scenarios
            .into_iter()
            .find(|s| s.name == name)
            .ok_or_else(|| {
                warn!("Unknown scenario requested: '{}'", name);
                OrchestratorError::UnknownScenario {
                    name: name.to_string(),
                    available,
                }
            })
    }
}
