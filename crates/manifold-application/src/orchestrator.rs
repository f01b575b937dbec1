//! Session orchestration: fan the two provider calls out, fan one state in.
//!
//! The orchestrator owns the single [`AnalysisSession`] and is the only
//! writer of its transitions. Both provider calls are launched together and
//! both are awaited; the session leaves `Running` only once the pair has
//! settled, so partial results are never shown.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::timeout;

use manifold_core::prompt;
use manifold_core::{AnalysisProvider, AnalysisSession, ImageProvider, ManifoldError, Topic};

/// Shown to the user when the analysis call fails. The underlying provider
/// cause is logged, never surfaced.
pub const ANALYSIS_FAILED_MESSAGE: &str = "An error occurred while connecting to the \
dimensional field. Please check your API key or connection.";

/// Upper bound on each provider call so a hung request cannot pin the
/// session in `Running` forever.
pub const PROVIDER_TIMEOUT: Duration = Duration::from_secs(120);

/// Coordinates one analysis session at a time against the two providers.
pub struct Orchestrator {
    text: Arc<dyn AnalysisProvider>,
    image: Arc<dyn ImageProvider>,
    session: RwLock<AnalysisSession>,
    /// Monotonic submission counter; results from a superseded submission
    /// are discarded instead of racing the newer one.
    generation: AtomicU64,
}

impl Orchestrator {
    pub fn new(text: Arc<dyn AnalysisProvider>, image: Arc<dyn ImageProvider>) -> Self {
        Self {
            text,
            image,
            session: RwLock::new(AnalysisSession::Idle),
            generation: AtomicU64::new(0),
        }
    }

    /// Current session snapshot.
    pub async fn session(&self) -> AnalysisSession {
        self.session.read().await.clone()
    }

    /// Runs one analysis session for `topic` and returns the session as it
    /// stands once this submission's pair of calls has settled.
    ///
    /// Entering `Running` clears any previous result or error by
    /// construction. The image prompt is derived from the raw topic rather
    /// than the analysis output, trading visual relevance for latency; the
    /// two calls therefore have no ordering dependency and are joined with
    /// collect-all semantics, not fail-fast.
    pub async fn submit(&self, topic: Topic) -> AnalysisSession {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut session = self.session.write().await;
            if self.generation.load(Ordering::SeqCst) == generation {
                *session = AnalysisSession::Running {
                    topic: topic.clone(),
                    generation,
                };
            }
        }

        let analysis_prompt = prompt::build_analysis_prompt(&topic);
        let image_prompt = prompt::build_image_prompt(&topic);

        let text_call = async {
            match timeout(PROVIDER_TIMEOUT, self.text.request_analysis(&analysis_prompt)).await {
                Ok(result) => result,
                Err(_) => Err(ManifoldError::provider(format!(
                    "Analysis request timed out after {}s",
                    PROVIDER_TIMEOUT.as_secs()
                ))),
            }
        };
        let image_call = async {
            match timeout(PROVIDER_TIMEOUT, self.image.request_image(&image_prompt)).await {
                Ok(image) => image,
                Err(_) => {
                    tracing::warn!(
                        "Image request timed out after {}s",
                        PROVIDER_TIMEOUT.as_secs()
                    );
                    None
                }
            }
        };

        let (text_result, image_result) = tokio::join!(text_call, image_call);

        let mut session = self.session.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "Discarding results of superseded submission");
            return session.clone();
        }

        *session = match text_result {
            Ok(analysis) => AnalysisSession::Succeeded {
                topic,
                analysis,
                image: image_result,
            },
            Err(err) => {
                // The image result is dropped here even when present: there
                // is no meaningful way to show a diagram without its analysis.
                tracing::error!("Analysis request failed: {err}");
                AnalysisSession::Failed {
                    topic,
                    error_message: ANALYSIS_FAILED_MESSAGE.to_string(),
                }
            }
        };
        session.clone()
    }

    /// Returns the session to `Idle`, clearing topic and all result fields.
    /// Also claims a new generation so a pair still in flight settles stale
    /// and cannot overwrite the cleared state.
    pub async fn reset(&self) -> AnalysisSession {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut session = self.session.write().await;
        *session = AnalysisSession::Idle;
        session.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use manifold_core::{DataUri, Result as CoreResult, SessionStatus};

    struct StubAnalysis {
        response: CoreResult<String>,
        delay: Duration,
    }

    impl StubAnalysis {
        fn ok(body: &str) -> Self {
            Self {
                response: Ok(body.to_string()),
                delay: Duration::ZERO,
            }
        }

        fn err(message: &str) -> Self {
            Self {
                response: Err(ManifoldError::provider(message)),
                delay: Duration::ZERO,
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[async_trait]
    impl AnalysisProvider for StubAnalysis {
        async fn request_analysis(&self, prompt: &str) -> CoreResult<String> {
            tokio::time::sleep(self.delay).await;
            self.response
                .clone()
                .map(|body| format!("{body} [{prompt}]"))
        }
    }

    struct StubImage {
        image: Option<DataUri>,
    }

    #[async_trait]
    impl ImageProvider for StubImage {
        async fn request_image(&self, _prompt: &str) -> Option<DataUri> {
            self.image.clone()
        }
    }

    fn orchestrator(text: StubAnalysis, image: Option<DataUri>) -> Orchestrator {
        Orchestrator::new(Arc::new(text), Arc::new(StubImage { image }))
    }

    fn topic(raw: &str) -> Topic {
        Topic::new(raw).unwrap()
    }

    #[tokio::test]
    async fn successful_pair_reaches_succeeded_with_image() {
        let orch = orchestrator(
            StubAnalysis::ok("## Analysis"),
            Some(DataUri::new("image/png", "AAAA")),
        );

        let session = orch.submit(topic("Procrastination")).await;
        match session {
            AnalysisSession::Succeeded {
                topic,
                analysis,
                image,
            } => {
                assert_eq!(topic.as_str(), "Procrastination");
                assert!(analysis.starts_with("## Analysis"));
                assert!(analysis.contains("Procrastination"));
                assert_eq!(image.unwrap().as_str(), "data:image/png;base64,AAAA");
            }
            other => panic!("expected Succeeded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn absent_image_still_succeeds() {
        let orch = orchestrator(StubAnalysis::ok("body"), None);

        let session = orch.submit(topic("X")).await;
        match session {
            AnalysisSession::Succeeded { image, .. } => assert!(image.is_none()),
            other => panic!("expected Succeeded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn text_failure_fails_session_even_when_image_succeeded() {
        let orch = orchestrator(
            StubAnalysis::err("connection refused"),
            Some(DataUri::new("image/png", "AAAA")),
        );

        let session = orch.submit(topic("X")).await;
        match session {
            AnalysisSession::Failed {
                topic,
                error_message,
            } => {
                assert_eq!(topic.as_str(), "X");
                // The fixed message, not the raw provider cause.
                assert_eq!(error_message, ANALYSIS_FAILED_MESSAGE);
                assert!(!error_message.contains("connection refused"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn resubmission_clears_previous_failure() {
        let failing = orchestrator(StubAnalysis::err("boom"), None);
        let failed = failing.submit(topic("first")).await;
        assert_eq!(failed.status(), SessionStatus::Failed);

        // Same orchestrator cannot swap providers, so drive a fresh pair and
        // check the state carries nothing over from the failed run.
        let orch = orchestrator(StubAnalysis::ok("fresh"), None);
        let _ = orch.submit(topic("first")).await;
        let session = orch.submit(topic("second")).await;
        match session {
            AnalysisSession::Succeeded { topic, .. } => assert_eq!(topic.as_str(), "second"),
            other => panic!("expected Succeeded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn reset_always_returns_a_clean_idle() {
        let orch = orchestrator(StubAnalysis::ok("body"), Some(DataUri::new("image/png", "A")));
        let _ = orch.submit(topic("X")).await;

        let session = orch.reset().await;
        assert_eq!(session, AnalysisSession::Idle);
        assert!(session.topic().is_none());

        let failing = orchestrator(StubAnalysis::err("boom"), None);
        let _ = failing.submit(topic("X")).await;
        assert_eq!(failing.reset().await, AnalysisSession::Idle);
    }

    #[tokio::test]
    async fn reset_during_running_discards_the_inflight_pair() {
        let orch = Arc::new(orchestrator(
            StubAnalysis::ok("late result").with_delay(Duration::from_millis(100)),
            None,
        ));

        let inflight = {
            let orch = Arc::clone(&orch);
            tokio::spawn(async move { orch.submit(topic("dismissed")).await })
        };
        // Reset while the pair is still in flight.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(orch.reset().await, AnalysisSession::Idle);

        // The settling pair is stale; the cleared state must survive it.
        let settled = inflight.await.unwrap();
        assert_eq!(settled, AnalysisSession::Idle);
        assert_eq!(orch.session().await, AnalysisSession::Idle);
    }

    #[tokio::test]
    async fn superseded_submission_never_overwrites_newer_result() {
        let orch = Arc::new(orchestrator(
            StubAnalysis::ok("slow").with_delay(Duration::from_millis(100)),
            None,
        ));

        let stale = {
            let orch = Arc::clone(&orch);
            tokio::spawn(async move { orch.submit(topic("stale topic")).await })
        };
        // Let the first submission claim its generation before superseding it.
        tokio::time::sleep(Duration::from_millis(20)).await;
        let fresh = orch.submit(topic("fresh topic")).await;
        let stale = stale.await.unwrap();

        // Both calls observe the newer session; the stale pair was discarded.
        assert_eq!(fresh.topic().map(Topic::as_str), Some("fresh topic"));
        assert_eq!(stale.topic().map(Topic::as_str), Some("fresh topic"));
        assert_eq!(
            orch.session().await.topic().map(Topic::as_str),
            Some("fresh topic")
        );
    }
}
