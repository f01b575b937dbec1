//! Text-analysis agent backed by the Gemini REST API.

use async_trait::async_trait;
use reqwest::Client;

use manifold_core::{AnalysisProvider, Result};

use crate::config;
use crate::gemini::{
    self, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
    ThinkingConfig,
};

/// Default model for complex reasoning tasks.
pub const ANALYSIS_MODEL: &str = "gemini-3-pro-preview";

/// Bounded reasoning effort allowed for the analysis call.
const THINKING_BUDGET: u32 = 2048;

/// Substituted when the provider answers with an empty body.
pub const EMPTY_ANALYSIS_PLACEHOLDER: &str = "No analysis generated.";

/// Provider adapter issuing one `generateContent` call per analysis request.
#[derive(Clone)]
pub struct GeminiAnalysisAgent {
    client: Client,
    model: String,
}

impl GeminiAnalysisAgent {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            model: ANALYSIS_MODEL.to_string(),
        }
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl Default for GeminiAnalysisAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnalysisProvider for GeminiAnalysisAgent {
    async fn request_analysis(&self, prompt: &str) -> Result<String> {
        let api_key = config::resolve_api_key()?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: Some(GenerationConfig {
                thinking_config: Some(ThinkingConfig {
                    thinking_budget: THINKING_BUDGET,
                }),
            }),
        };

        tracing::debug!(model = %self.model, "Sending analysis request");
        let started = std::time::Instant::now();
        let response =
            gemini::send_generate_content(&self.client, &self.model, &api_key, &request).await?;
        tracing::debug!(
            model = %self.model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Analysis response received"
        );

        Ok(normalize_analysis(extract_text(response)))
    }
}

/// Substitutes the fixed placeholder for an empty provider body.
fn normalize_analysis(text: Option<String>) -> String {
    text.filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| EMPTY_ANALYSIS_PLACEHOLDER.to_string())
}

/// Pulls the first text part out of the first candidate.
fn extract_text(response: GenerateContentResponse) -> Option<String> {
    response
        .candidates?
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .find_map(|part| part.text)
}
