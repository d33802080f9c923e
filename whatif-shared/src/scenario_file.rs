//! JSON5 parsing for scenario definition files.
//!
//! Scenario files let users add stress scenarios to a wired model without
//! recompiling. A file holds exactly one scenario:
//!
//! ```json5
//! {
//!     name: "rates_up_200",
//!     description: "Parallel +200bps shift",
//!     stress_rationale: "Aggressive tightening",
//!     overrides: { yield_10y: 6.25, yield_2y: 6.80 },
//! }
//! ```
//!
//! `description` and `stress_rationale` are optional and default to empty text.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::errors::{ScenarioFileError, ScenarioFileResult};
use crate::scenario::ScenarioDefinition;

/// Intermediate struct for JSON5 deserialization of a scenario file
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioFile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub stress_rationale: String,
    #[serde(default)]
    pub overrides: BTreeMap<String, f64>,
}

impl ScenarioFile {
    /// Convert to a ScenarioDefinition, rejecting blank names and non-finite values
    pub fn to_scenario_definition(self) -> ScenarioFileResult<ScenarioDefinition> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ScenarioFileError::ValidationError {
                message: "Scenario field 'name' cannot be empty".to_string(),
            });
        }

        if let Some((field, value)) = self.overrides.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ScenarioFileError::ValidationError {
                message: format!("Override '{}' has non-finite value {}", field, value),
            });
        }

        Ok(ScenarioDefinition {
            name: name.to_string(),
            description: self.description,
            stress_rationale: self.stress_rationale,
            overrides: self.overrides,
        })
    }
}

/// Parse a scenario file from a JSON5 string without validation
pub fn parse_scenario_json5(json5_content: &str) -> ScenarioFileResult<ScenarioFile> {
    Ok(json5::from_str(json5_content)?)
}

/// Parse and convert a scenario from a JSON5 string
pub fn parse_scenario(json5_content: &str) -> ScenarioFileResult<ScenarioDefinition> {
    parse_scenario_json5(json5_content)?.to_scenario_definition()
}

/// Parse a scenario from a file path
pub fn parse_scenario_file(path: &std::path::Path) -> ScenarioFileResult<ScenarioDefinition> {
    let content = std::fs::read_to_string(path)?;
    parse_scenario(&content)
}
