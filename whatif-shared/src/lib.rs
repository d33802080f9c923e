//! Shared types and message definitions for the whatif scenario engine.
//!
//! This crate contains the data structures exchanged between the scenario
//! orchestrator and the adapters that drive it (command line, stdio session
//! server, tool-calling layers). Nothing in here holds state or performs I/O
//! beyond reading scenario files.
//!
//! # Key Components
//!
//! * [`schema`] - [`ModelSchema`], [`InputField`] and [`OutputField`] metadata
//! * [`scenario`] - [`ScenarioDefinition`], [`Override`], [`ScenarioResult`] and
//!   [`ScenarioComparison`]
//! * [`protocol`] - the exhaustive [`Command`] set and its [`CommandResponse`]
//! * [`scenario_file`] - JSON5 scenario definition files
//! * [`errors`] - error enums and result aliases
//!
//! # Override precedence
//!
//! ```text
//! call override  >  session override  >  scenario override  >  base input
//! ```

pub mod errors;
pub mod protocol;
pub mod scenario;
pub mod scenario_file;
pub mod schema;

pub use errors::{DispatchError, OrchestratorError, RunnerError, ScenarioFileError};
pub use protocol::{Command, CommandResponse, ToolCall};
pub use scenario::{
    FieldMap, FieldValue, MetricDifference, Override, OutputMap, ScenarioComparison,
    ScenarioDefinition, ScenarioResult,
};
pub use schema::{InputField, ModelSchema, OutputField};
