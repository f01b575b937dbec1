//! Core domain types for Manifold.
//!
//! Holds the validated [`Topic`], the [`AnalysisSession`] state machine, the
//! provider seams the orchestrator fans out to, and the shared error type.

pub mod error;
pub mod prompt;
pub mod provider;
pub mod session;
pub mod topic;

pub use error::{ManifoldError, Result};
pub use provider::{AnalysisProvider, DataUri, ImageProvider};
pub use session::{AnalysisSession, SessionStatus};
pub use topic::Topic;
