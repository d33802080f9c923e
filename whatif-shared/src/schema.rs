//! Model schema metadata.
//!
//! A [`ModelSchema`] describes what a model consumes and produces, together with
//! the assumptions and caveats a reader needs to interpret its outputs. Schemas
//! are built once when a model is wired and are never mutated afterwards.

use serde::{Deserialize, Serialize};

/// A single model input variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputField {
    /// Unique field name, used as the join key for overrides
    pub name: String,
    /// Logical grouping label, e.g. "rates", "credit", "portfolio"
    pub source: String,
    pub description: String,
    pub units: String,
    pub typical_min: f64,
    pub typical_max: f64,
    #[serde(default)]
    pub current_value: Option<f64>,
}

impl InputField {
    /// Create an input field with its typical range
    pub fn new(
        name: &str,
        source: &str,
        description: &str,
        units: &str,
        typical_range: (f64, f64),
    ) -> Self {
        Self {
            name: name.to_string(),
            source: source.to_string(),
            description: description.to_string(),
            units: units.to_string(),
            typical_min: typical_range.0,
            typical_max: typical_range.1,
            current_value: None,
        }
    }

    /// Attach the value the model currently uses for this input
    pub fn with_current_value(mut self, value: f64) -> Self {
        self.current_value = Some(value);
        self
    }

    /// Whether a value falls inside the typical range (inclusive)
    pub fn is_typical(&self, value: f64) -> bool {
        value >= self.typical_min && value <= self.typical_max
    }
}

/// A single model output metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputField {
    pub name: String,
    pub description: String,
    pub units: String,
    /// How a reader should interpret movements in this metric
    pub interpretation: String,
    /// Value below which the result is concerning (presentation only)
    #[serde(default)]
    pub good_threshold: Option<f64>,
    /// Value below which the result is critical (presentation only)
    #[serde(default)]
    pub bad_threshold: Option<f64>,
}

impl OutputField {
    pub fn new(name: &str, description: &str, units: &str, interpretation: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            units: units.to_string(),
            interpretation: interpretation.to_string(),
            good_threshold: None,
            bad_threshold: None,
        }
    }

    pub fn with_thresholds(mut self, good: f64, bad: f64) -> Self {
        self.good_threshold = Some(good);
        self.bad_threshold = Some(bad);
        self
    }
}

/// Full description of a model's inputs, outputs, assumptions, and caveats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSchema {
    pub name: String,
    pub description: String,
    pub inputs: Vec<InputField>,
    pub outputs: Vec<OutputField>,
    pub assumptions: Vec<String>,
    pub caveats: Vec<String>,
}

impl ModelSchema {
    /// Look up an input field by name
    pub fn input(&self, name: &str) -> Option<&InputField> {
        self.inputs.iter().find(|field| field.name == name)
    }

    /// Look up an output field by name
    pub fn output(&self, name: &str) -> Option<&OutputField> {
        self.outputs.iter().find(|field| field.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> ModelSchema {
        ModelSchema {
            name: "Rate Model".to_string(),
            description: "Single-factor rate sensitivity".to_string(),
            inputs: vec![
                InputField::new("rate", "rates", "Policy rate", "%", (0.0, 10.0))
                    .with_current_value(5.0),
            ],
            outputs: vec![OutputField::new(
                "value",
                "Portfolio value",
                "GBP m",
                "Higher is better",
            )],
            assumptions: vec!["Linear sensitivity".to_string()],
            caveats: vec![],
        }
    }

    #[test]
    fn test_field_lookup() {
        let schema = sample_schema();
        assert_eq!(schema.input("rate").unwrap().current_value, Some(5.0));
        assert!(schema.input("spread").is_none());
        assert_eq!(schema.output("value").unwrap().units, "GBP m");
    }

    #[test]
    fn test_typical_range_is_inclusive() {
        let field = InputField::new("rate", "rates", "Policy rate", "%", (0.0, 10.0));
        assert!(field.is_typical(0.0));
        assert!(field.is_typical(10.0));
        assert!(!field.is_typical(10.5));
    }

    #[test]
    fn test_schema_serializes_contract_field_names() {
        let json = serde_json::to_value(sample_schema()).unwrap();

        let input = &json["inputs"][0];
        for key in [
            "name",
            "source",
            "description",
            "units",
            "typical_min",
            "typical_max",
            "current_value",
        ] {
            assert!(input.get(key).is_some(), "missing input key {key}");
        }

        let output = &json["outputs"][0];
        assert!(output["good_threshold"].is_null());
        assert!(output["bad_threshold"].is_null());
        assert_eq!(json["assumptions"][0], "Linear sensitivity");
    }
}
