//! Gemini REST adapters for Manifold.
//!
//! One agent per provider operation: [`GeminiAnalysisAgent`] for the Markdown
//! analysis and [`GeminiImageAgent`] for the best-effort system diagram. Both
//! resolve the API credential at call time via [`config`].

pub mod analysis_agent;
pub mod config;
mod gemini;
pub mod image_agent;

pub use analysis_agent::{ANALYSIS_MODEL, EMPTY_ANALYSIS_PLACEHOLDER, GeminiAnalysisAgent};
pub use image_agent::{GeminiImageAgent, IMAGE_MODEL};
