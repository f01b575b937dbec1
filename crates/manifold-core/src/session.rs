//! Analysis session state machine.
//!
//! The session is a tagged enum rather than a record of nullable fields so
//! that illegal combinations (a failed session holding image data, a running
//! session with leftover results) are unrepresentable.

use serde::{Deserialize, Serialize};

use crate::provider::DataUri;
use crate::topic::Topic;

/// One complete submit-to-result-or-error lifecycle for a single topic.
///
/// Transitions are owned by the orchestrator:
/// `Idle --submit--> Running --both settled--> Succeeded | Failed --reset--> Idle`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum AnalysisSession {
    /// No session in progress; waiting for a topic.
    Idle,
    /// Both provider calls are in flight for `topic`.
    Running {
        topic: Topic,
        /// Submission counter used to discard results of superseded runs.
        generation: u64,
    },
    /// The analysis call succeeded; the image is optional by design.
    Succeeded {
        topic: Topic,
        analysis: String,
        image: Option<DataUri>,
    },
    /// The analysis call failed; only the fixed user-facing message is kept.
    Failed {
        topic: Topic,
        error_message: String,
    },
}

impl AnalysisSession {
    pub fn status(&self) -> SessionStatus {
        match self {
            Self::Idle => SessionStatus::Idle,
            Self::Running { .. } => SessionStatus::Running,
            Self::Succeeded { .. } => SessionStatus::Succeeded,
            Self::Failed { .. } => SessionStatus::Failed,
        }
    }

    /// The topic under analysis, if a session has been started.
    pub fn topic(&self) -> Option<&Topic> {
        match self {
            Self::Idle => None,
            Self::Running { topic, .. }
            | Self::Succeeded { topic, .. }
            | Self::Failed { topic, .. } => Some(topic),
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }
}

/// Discriminant of [`AnalysisSession`] for display and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Idle,
    Running,
    Succeeded,
    Failed,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(raw: &str) -> Topic {
        Topic::new(raw).unwrap()
    }

    #[test]
    fn idle_has_no_topic() {
        assert_eq!(AnalysisSession::Idle.topic(), None);
        assert_eq!(AnalysisSession::Idle.status(), SessionStatus::Idle);
    }

    #[test]
    fn every_started_state_exposes_its_topic() {
        let running = AnalysisSession::Running {
            topic: topic("X"),
            generation: 1,
        };
        let failed = AnalysisSession::Failed {
            topic: topic("X"),
            error_message: "boom".to_string(),
        };
        assert_eq!(running.topic().map(Topic::as_str), Some("X"));
        assert!(running.is_running());
        assert_eq!(failed.status(), SessionStatus::Failed);
    }

    #[test]
    fn succeeded_image_is_optional() {
        let session = AnalysisSession::Succeeded {
            topic: topic("Procrastination"),
            analysis: "## Analysis".to_string(),
            image: None,
        };
        assert_eq!(session.status(), SessionStatus::Succeeded);
    }
}
