//! What-if scenario engine backend.
//!
//! Wires a quantitative model into a [`scenario::ScenarioOrchestrator`] and
//! exposes it through the command dispatcher, the stdio session server and the
//! command line.

pub mod adapters;
pub mod config;
pub mod scenario;
pub mod services;
