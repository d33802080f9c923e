//! Capability interfaces the orchestrator depends on.
//!
//! Any backend can sit behind these traits: an in-memory catalog, a runner fed
//! by live market data, a database-backed repository. The orchestrator only
//! ever talks to them through `Box<dyn _>`.

use whatif_shared::errors::RunnerResult;
use whatif_shared::{FieldMap, InputField, ModelSchema, ScenarioDefinition, ScenarioResult};

/// Executes scenarios against the underlying model.
///
/// Implementations must merge, in increasing precedence, their own base
/// inputs, then `scenario.overrides`, then `extra_overrides`, evaluate the
/// model with the merged inputs, and report `scenario.overrides` merged with
/// `extra_overrides` (extra wins) as the applied overrides. The orchestrator's
/// precedence rules rely on exactly this order.
pub trait ScenarioRunner: Send + Sync {
    fn run(
        &self,
        scenario: &ScenarioDefinition,
        extra_overrides: &FieldMap,
    ) -> RunnerResult<ScenarioResult>;
}

/// Read-only access to model metadata and the scenario catalog.
///
/// Returned values must stay stable for the lifetime of a wiring.
pub trait ModelRepository: Send + Sync {
    fn scenarios(&self) -> Vec<ScenarioDefinition>;

    fn schema(&self) -> ModelSchema;

    /// Current state of all model inputs
    fn inputs(&self) -> Vec<InputField>;
}
