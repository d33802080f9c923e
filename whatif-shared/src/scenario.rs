//! Scenario data structures and types.
//!
//! This module defines the entities that flow through the scenario engine:
//! scenario definitions owned by a model repository, session overrides, the
//! result of a single scenario run, and the side-by-side comparison of two runs.
//! Every type serializes with the field names downstream adapters rely on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field name → numeric value, used for inputs and every override layer
pub type FieldMap = BTreeMap<String, f64>;

/// Metric name → output value produced by a model
pub type OutputMap = BTreeMap<String, FieldValue>;

/// A single value produced by a model.
///
/// Models are expected to produce numbers, but placeholder and diagnostic
/// models may emit flags or text. Only [`FieldValue::Number`] takes part in
/// comparison arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Numeric view of the value, `None` for flags and text
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(value) => Some(*value),
            FieldValue::Bool(_) | FieldValue::Text(_) => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Bool(value) => write!(f, "{}", value),
            FieldValue::Number(value) => write!(f, "{}", value),
            FieldValue::Text(value) => write!(f, "{}", value),
        }
    }
}

/// A named scenario with its baseline overrides and stress description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDefinition {
    /// Unique name within a repository
    pub name: String,
    pub description: String,
    /// Why this scenario is worth running
    pub stress_rationale: String,
    /// Deltas from the model's base inputs
    #[serde(default)]
    pub overrides: FieldMap,
}

impl ScenarioDefinition {
    pub fn new(name: &str, description: &str, stress_rationale: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            stress_rationale: stress_rationale.to_string(),
            overrides: FieldMap::new(),
        }
    }

    /// Add a baseline override to the scenario
    pub fn with_override(mut self, field: &str, value: f64) -> Self {
        self.overrides.insert(field.to_string(), value);
        self
    }
}

/// A single active session-level input override
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Override {
    /// Logical grouping label supplied by the caller
    pub source: String,
    pub field: String,
    pub value: f64,
    pub applied_at: DateTime<Utc>,
}

impl Override {
    /// Create an override stamped with the current time
    pub fn new(source: &str, field: &str, value: f64) -> Self {
        Self {
            source: source.to_string(),
            field: field.to_string(),
            value,
            applied_at: Utc::now(),
        }
    }
}

/// The result of running a scenario through the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    /// Fully resolved inputs the model was evaluated with
    pub inputs_used: FieldMap,
    pub outputs: OutputMap,
    /// Scenario overrides merged with the extra overrides of the run
    pub overrides_applied: FieldMap,
    pub run_at: DateTime<Utc>,
}

impl ScenarioResult {
    /// Numeric value of an output metric, if present and numeric
    pub fn output_number(&self, metric: &str) -> Option<f64> {
        self.outputs.get(metric).and_then(FieldValue::as_number)
    }
}

// `run_at` is informational metadata and never part of result identity.
impl PartialEq for ScenarioResult {
    fn eq(&self, other: &Self) -> bool {
        self.scenario_name == other.scenario_name
            && self.inputs_used == other.inputs_used
            && self.outputs == other.outputs
            && self.overrides_applied == other.overrides_applied
    }
}

/// Per-metric difference between two scenario results.
///
/// `delta` and `percent_change` are `None` whenever either side is missing or
/// non-numeric; `percent_change` is also `None` when the baseline is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDifference {
    pub value_a: Option<FieldValue>,
    pub value_b: Option<FieldValue>,
    pub delta: Option<f64>,
    pub percent_change: Option<f64>,
}

/// Side-by-side comparison of two scenario results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub scenario_a: ScenarioResult,
    pub scenario_b: ScenarioResult,
    /// Metrics compared, in the order they were requested
    pub metrics: Vec<String>,
    pub differences: BTreeMap<String, MetricDifference>,
}
