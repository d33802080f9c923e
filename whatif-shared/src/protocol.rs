//! Command protocol shared by every adapter that drives the scenario engine.
//!
//! Tool-calling layers hand the engine a tool name and a JSON argument object.
//! [`Command::from_tool_call`] turns that pair into one of a fixed set of
//! commands; an unrecognised tool name is a distinct [`DispatchError::UnknownCommand`]
//! rather than a silent lookup miss. Results travel back as [`CommandResponse`],
//! whose [`CommandResponse::to_json`] is the projection adapters print or send.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;

use crate::errors::{DispatchError, DispatchResult};
use crate::scenario::{FieldMap, Override, ScenarioComparison, ScenarioDefinition, ScenarioResult};
use crate::schema::{InputField, ModelSchema};

/// A single tool invocation as received on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Every operation the scenario engine exposes to adapters
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    RunScenario {
        name: String,
        overrides: Option<FieldMap>,
    },
    OverrideInput {
        source: String,
        field: String,
        value: f64,
    },
    ResetOverrides,
    CompareScenarios {
        scenario_a: String,
        scenario_b: String,
        metrics: Option<Vec<String>>,
    },
    GetAvailableScenarios,
    GetModelSchema,
    GetModelInputs,
    GetCurrentResults,
    GetActiveOverrides,
}

#[derive(Deserialize)]
struct RunScenarioArgs {
    name: String,
    #[serde(default)]
    overrides: Option<FieldMap>,
}

#[derive(Deserialize)]
struct OverrideInputArgs {
    source: String,
    field: String,
    value: f64,
}

#[derive(Deserialize)]
struct CompareScenariosArgs {
    scenario_a: String,
    scenario_b: String,
    #[serde(default)]
    metrics: Option<Vec<String>>,
}

impl Command {
    /// Tool names accepted by [`Command::from_tool_call`]
    pub const TOOL_NAMES: [&'static str; 9] = [
        "run_scenario",
        "override_input",
        "reset_overrides",
        "compare_scenarios",
        "get_available_scenarios",
        "get_model_schema",
        "get_model_inputs",
        "get_current_results",
        "get_active_overrides",
    ];

    /// Build a command from a tool name and its JSON arguments.
    ///
    /// A `null` argument value is treated as an empty object. Commands without
    /// parameters ignore whatever arguments they are given.
    pub fn from_tool_call(name: &str, arguments: Value) -> DispatchResult<Self> {
        let arguments = if arguments.is_null() {
            json!({})
        } else {
            arguments
        };

        match name {
            "run_scenario" => {
                let args: RunScenarioArgs = decode(name, arguments)?;
                Ok(Command::RunScenario {
                    name: args.name,
                    overrides: args.overrides,
                })
            }
            "override_input" => {
                let args: OverrideInputArgs = decode(name, arguments)?;
                Ok(Command::OverrideInput {
                    source: args.source,
                    field: args.field,
                    value: args.value,
                })
            }
            "reset_overrides" => Ok(Command::ResetOverrides),
            "compare_scenarios" => {
                let args: CompareScenariosArgs = decode(name, arguments)?;
                Ok(Command::CompareScenarios {
                    scenario_a: args.scenario_a,
                    scenario_b: args.scenario_b,
                    metrics: args.metrics,
                })
            }
            "get_available_scenarios" => Ok(Command::GetAvailableScenarios),
            "get_model_schema" => Ok(Command::GetModelSchema),
            "get_model_inputs" => Ok(Command::GetModelInputs),
            "get_current_results" => Ok(Command::GetCurrentResults),
            "get_active_overrides" => Ok(Command::GetActiveOverrides),
            _ => Err(DispatchError::UnknownCommand {
                name: name.to_string(),
            }),
        }
    }

    /// Tool name this command is dispatched under
    pub fn tool_name(&self) -> &'static str {
        match self {
            Command::RunScenario { .. } => "run_scenario",
            Command::OverrideInput { .. } => "override_input",
            Command::ResetOverrides => "reset_overrides",
            Command::CompareScenarios { .. } => "compare_scenarios",
            Command::GetAvailableScenarios => "get_available_scenarios",
            Command::GetModelSchema => "get_model_schema",
            Command::GetModelInputs => "get_model_inputs",
            Command::GetCurrentResults => "get_current_results",
            Command::GetActiveOverrides => "get_active_overrides",
        }
    }
}

impl TryFrom<ToolCall> for Command {
    type Error = DispatchError;

    fn try_from(call: ToolCall) -> Result<Self, Self::Error> {
        Command::from_tool_call(&call.tool, call.arguments)
    }
}

fn decode<T: DeserializeOwned>(command: &str, arguments: Value) -> DispatchResult<T> {
    serde_json::from_value(arguments).map_err(|e| DispatchError::InvalidArguments {
        command: command.to_string(),
        message: e.to_string(),
    })
}

/// Outcome of a successfully executed command
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResponse {
    ScenarioRun(ScenarioResult),
    OverrideApplied {
        message: String,
        source: String,
        field: String,
        value: f64,
    },
    OverridesReset {
        message: String,
    },
    Comparison(ScenarioComparison),
    Scenarios(Vec<ScenarioDefinition>),
    Schema(ModelSchema),
    Inputs(Vec<InputField>),
    CurrentResults(BTreeMap<String, ScenarioResult>),
    ActiveOverrides(Vec<Override>),
}

impl CommandResponse {
    /// Flat JSON projection handed to adapters
    pub fn to_json(&self) -> serde_json::Result<Value> {
        match self {
            CommandResponse::ScenarioRun(result) => serde_json::to_value(result),
            CommandResponse::OverrideApplied {
                message,
                source,
                field,
                value,
            } => Ok(json!({
                "message": message,
                "source": source,
                "field": field,
                "value": value,
            })),
            CommandResponse::OverridesReset { message } => Ok(json!({ "message": message })),
            CommandResponse::Comparison(comparison) => serde_json::to_value(comparison),
            CommandResponse::Scenarios(scenarios) => {
                Ok(json!({ "scenarios": serde_json::to_value(scenarios)? }))
            }
            CommandResponse::Schema(schema) => serde_json::to_value(schema),
            CommandResponse::Inputs(inputs) => serde_json::to_value(inputs),
            CommandResponse::CurrentResults(results) => serde_json::to_value(results),
            CommandResponse::ActiveOverrides(overrides) => serde_json::to_value(overrides),
        }
    }
}

/// JSON object adapters return in place of a response when a command fails
pub fn error_json(message: impl std::fmt::Display) -> Value {
    json!({ "error": message.to_string() })
}
