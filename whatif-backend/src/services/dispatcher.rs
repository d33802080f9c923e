//! Command Dispatcher
//!
//! Routes [`Command`]s to the session's [`ScenarioOrchestrator`] and shapes the
//! outcome for adapters. [`CommandDispatcher::dispatch_tool`] is the entry point
//! for tool-calling layers: it never fails, every error becomes an
//! `{"error": "<message>"}` object.

use serde_json::Value;
use tracing::{debug, instrument, warn};

use whatif_shared::errors::DispatchResult;
use whatif_shared::protocol::error_json;
use whatif_shared::{Command, CommandResponse};

use crate::scenario::ScenarioOrchestrator;

pub struct CommandDispatcher {
    orchestrator: ScenarioOrchestrator,
}

impl CommandDispatcher {
    pub fn new(orchestrator: ScenarioOrchestrator) -> Self {
        Self { orchestrator }
    }

    pub fn orchestrator(&self) -> &ScenarioOrchestrator {
        &self.orchestrator
    }

    /// Execute a command against the session orchestrator
    #[instrument(skip(self, command), fields(tool = command.tool_name()))]
    pub fn dispatch(&mut self, command: Command) -> DispatchResult<CommandResponse> {
        debug!("Dispatching {:?}", command);
        let orchestrator = &mut self.orchestrator;

        let response = match command {
            Command::RunScenario { name, overrides } => {
                CommandResponse::ScenarioRun(orchestrator.run_scenario(&name, overrides.as_ref())?)
            }
            Command::OverrideInput {
                source,
                field,
                value,
            } => {
                let message = orchestrator.override_input(&source, &field, value);
                CommandResponse::OverrideApplied {
                    message,
                    source,
                    field,
                    value,
                }
            }
            Command::ResetOverrides => CommandResponse::OverridesReset {
                message: orchestrator.reset_overrides(),
            },
            Command::CompareScenarios {
                scenario_a,
                scenario_b,
                metrics,
            } => CommandResponse::Comparison(orchestrator.compare_scenarios(
                &scenario_a,
                &scenario_b,
                metrics,
            )?),
            Command::GetAvailableScenarios => {
                CommandResponse::Scenarios(orchestrator.available_scenarios())
            }
            Command::GetModelSchema => CommandResponse::Schema(orchestrator.model_schema()),
            Command::GetModelInputs => CommandResponse::Inputs(orchestrator.model_inputs()),
            Command::GetCurrentResults => {
                CommandResponse::CurrentResults(orchestrator.current_results())
            }
            Command::GetActiveOverrides => {
                CommandResponse::ActiveOverrides(orchestrator.active_overrides())
            }
        };

        Ok(response)
    }

    /// Execute a tool call by name and return its JSON projection
    #[instrument(skip(self, arguments))]
    pub fn dispatch_tool(&mut self, name: &str, arguments: Value) -> Value {
        let response = Command::from_tool_call(name, arguments).and_then(|c| self.dispatch(c));

        match response {
            Ok(response) => response.to_json().unwrap_or_else(|e| {
                warn!("Failed to serialize response for '{}': {}", name, e);
                error_json(e)
            }),
            Err(e) => {
                warn!("Tool '{}' failed: {}", name, e);
                error_json(e)
            }
        }
    }
}
