//! Topic domain type.

use serde::{Deserialize, Serialize};

use crate::error::{ManifoldError, Result};

/// A trimmed, non-empty subject string naming what one session analyzes.
///
/// Supplied once per session and immutable for the session's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    /// Validates and normalizes raw user input.
    ///
    /// The input is trimmed; an input that is empty after trimming is
    /// rejected with [`ManifoldError::EmptyTopic`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ManifoldError::EmptyTopic);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filename-safe form of the topic: lowercased, with every run of
    /// whitespace collapsed to a single `-`.
    pub fn slug(&self) -> String {
        self.0
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .to_lowercase()
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let topic = Topic::new("  Procrastination \n").unwrap();
        assert_eq!(topic.as_str(), "Procrastination");
    }

    #[test]
    fn rejects_empty_and_whitespace_only_input() {
        assert_eq!(Topic::new(""), Err(ManifoldError::EmptyTopic));
        assert_eq!(Topic::new("   \t"), Err(ManifoldError::EmptyTopic));
    }

    #[test]
    fn slug_lowercases_and_joins_whitespace_runs() {
        let topic = Topic::new("The Future   of Work").unwrap();
        assert_eq!(topic.slug(), "the-future-of-work");
    }

    #[test]
    fn slug_of_single_word_is_just_lowercased() {
        let topic = Topic::new("Procrastination").unwrap();
        assert_eq!(topic.slug(), "procrastination");
    }
}
