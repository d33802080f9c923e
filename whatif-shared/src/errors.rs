use thiserror::Error;

/// Failures raised by a scenario runner while executing the underlying model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunnerError {
    #[error("Model input '{field}' is missing for scenario '{scenario}'")]
    MissingInput { scenario: String, field: String },

    #[error("Model evaluation failed for scenario '{scenario}': {message}")]
    ModelFailed { scenario: String, message: String },
}

impl RunnerError {
    /// Create a ModelFailed error from any displayable cause
    pub fn model_failed(scenario: &str, cause: impl std::fmt::Display) -> Self {
        RunnerError::ModelFailed {
            scenario: scenario.to_string(),
            message: cause.to_string(),
        }
    }

    /// Create a MissingInput error; the runner fills in the scenario name
    pub fn missing_input(field: &str) -> Self {
        RunnerError::MissingInput {
            scenario: String::new(),
            field: field.to_string(),
        }
    }

    /// Attribute the error to a scenario
    pub fn with_scenario(self, name: &str) -> Self {
        match self {
            RunnerError::MissingInput { field, .. } => RunnerError::MissingInput {
                scenario: name.to_string(),
                field,
            },
            RunnerError::ModelFailed { message, .. } => RunnerError::ModelFailed {
                scenario: name.to_string(),
                message,
            },
        }
    }
}

/// Errors surfaced by the scenario orchestrator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrchestratorError {
    #[error("Unknown scenario '{name}'. Available: {}", available.join(", "))]
    UnknownScenario { name: String, available: Vec<String> },

    #[error(transparent)]
    Runner(#[from] RunnerError),
}

/// Errors raised while turning a tool call into a command and executing it
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Unknown tool '{name}'.")]
    UnknownCommand { name: String },

    #[error("Invalid arguments for '{command}': {message}")]
    InvalidArguments { command: String, message: String },

    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),
}

/// Errors raised while reading JSON5 scenario definition files
#[derive(Error, Debug)]
pub enum ScenarioFileError {
    #[error("JSON5 parse error: {0}")]
    Json5Error(#[from] json5::Error),

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type aliases for convenience
pub type RunnerResult<T> = Result<T, RunnerError>;
pub type OrchestratorResult<T> = Result<T, OrchestratorError>;
pub type DispatchResult<T> = Result<T, DispatchError>;
pub type ScenarioFileResult<T> = Result<T, ScenarioFileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_scenario_message_lists_names() {
        let err = OrchestratorError::UnknownScenario {
            name: "does_not_exist".to_string(),
            available: vec!["base".to_string(), "stress".to_string()],
        };

        assert_eq!(
            err.to_string(),
            "Unknown scenario 'does_not_exist'. Available: base, stress"
        );
    }

    #[test]
    fn test_runner_error_passes_through_unchanged() {
        let runner = RunnerError::model_failed("base", "division by zero");
        let err: OrchestratorError = runner.clone().into();

        assert_eq!(err.to_string(), runner.to_string());
        assert_eq!(err, OrchestratorError::Runner(runner));
    }

    #[test]
    fn test_unknown_command_message() {
        let err = DispatchError::UnknownCommand {
            name: "launch_rockets".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown tool 'launch_rockets'.");
    }
}
