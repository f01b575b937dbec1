//! Application layer: the orchestrator that owns the session lifecycle.

pub mod orchestrator;

pub use orchestrator::{ANALYSIS_FAILED_MESSAGE, Orchestrator, PROVIDER_TIMEOUT};
