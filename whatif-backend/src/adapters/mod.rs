//! Model wiring: concrete repositories and runners for the orchestrator.

pub mod demo;
pub mod in_memory;

use tracing::info;

use whatif_shared::ScenarioDefinition;

use crate::config::ModelChoice;
use crate::scenario::ScenarioOrchestrator;

/// Build a session orchestrator for the chosen model.
///
/// `extra_scenarios` (typically loaded from scenario files) replace built-in
/// scenarios with the same name and are otherwise appended to the catalog.
pub fn build_orchestrator(
    model: ModelChoice,
    extra_scenarios: Vec<ScenarioDefinition>,
) -> ScenarioOrchestrator {
    let (repository, runner) = match model {
        ModelChoice::Demo => demo::bond_portfolio_wiring(),
        ModelChoice::Stub => in_memory::stub_wiring(),
    };

    if !extra_scenarios.is_empty() {
        info!("Adding {} file-defined scenario(s)", extra_scenarios.len());
    }
    let repository = repository.with_extra_scenarios(extra_scenarios);

    ScenarioOrchestrator::new(Box::new(runner), Box::new(repository))
}
