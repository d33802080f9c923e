//! Scenario orchestration core.
//!
//! The orchestrator owns session state (overrides and cached results) and
//! talks to the wired model only through the [`ports`] capability traits.
//! The loader adds scenarios defined in `.json5` files to a model's catalog.

pub mod comparison;
pub mod loader;
pub mod orchestrator;
pub mod overrides;
pub mod ports;

pub use comparison::compare_results;
pub use loader::ScenarioLoader;
pub use orchestrator::ScenarioOrchestrator;
pub use overrides::OverrideStore;
pub use ports::{ModelRepository, ScenarioRunner};
