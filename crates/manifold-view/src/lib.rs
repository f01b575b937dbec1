//! Presentation layer: pure renderers from session state to terminal output.

pub mod markdown;
pub mod render;

pub use markdown::render_markdown;
pub use render::{IMAGE_PLACEHOLDER, SUGGESTED_TOPICS, image_filename, render_session};
