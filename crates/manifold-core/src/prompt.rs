//! Prompt builders for the two provider calls.
//!
//! Pure, deterministic concatenation of fixed templates with the topic
//! interpolated verbatim. No validation happens here; callers hand in an
//! already-validated [`Topic`].

use crate::topic::Topic;

/// Fixed instruction prepended to every analysis request.
pub const SYSTEM_PROMPT: &str = "You are a dimensional thinking analyst. \
Deconstruct the topic below into its core components, abstract the underlying \
principles, and identify the systemic feedback loops at play. Write the result \
as Markdown with clear headings, and close with a table summarizing the key \
loops. Topic:";

/// Prefix of the image-generation prompt.
pub const IMAGE_PROMPT_PREFIX: &str =
    "A minimalist abstract system diagram visualizing the concept of ";

/// Style suffix appended after the topic in the image prompt.
pub const IMAGE_PROMPT_STYLE: &str = ", thin glowing lines connecting labeled \
nodes on a dark blueprint background, clean futuristic infographic style";

/// Builds the text-analysis prompt for `topic`.
pub fn build_analysis_prompt(topic: &Topic) -> String {
    format!("{SYSTEM_PROMPT} {topic}")
}

/// Builds the image-generation prompt for `topic`.
pub fn build_image_prompt(topic: &Topic) -> String {
    format!("{IMAGE_PROMPT_PREFIX}{topic}{IMAGE_PROMPT_STYLE}")
}
