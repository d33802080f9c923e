//! Service layer for the whatif backend.
//!
//! Adapters that drive a session orchestrator: the command dispatcher used by
//! tool-calling layers and the newline-delimited JSON session server built on it.

pub mod dispatcher;
pub mod session_server;

pub use dispatcher::CommandDispatcher;
pub use session_server::SessionServer;
