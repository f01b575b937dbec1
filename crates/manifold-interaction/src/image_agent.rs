//! Image-generation agent backed by the Gemini REST API.
//!
//! Image generation is best-effort: a missing credential, a transport
//! failure, an HTTP error, or a response without any image part all collapse
//! to `None`. Only the analysis call can fail a session.

use async_trait::async_trait;
use reqwest::Client;

use manifold_core::{DataUri, ImageProvider, Result};

use crate::config;
use crate::gemini::{self, Content, GenerateContentRequest, GenerateContentResponse, Part};

/// Default image-generation model.
pub const IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Provider adapter issuing one `generateContent` call per image request.
#[derive(Clone)]
pub struct GeminiImageAgent {
    client: Client,
    model: String,
}

impl GeminiImageAgent {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            model: IMAGE_MODEL.to_string(),
        }
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    async fn try_request(&self, prompt: &str) -> Result<Option<DataUri>> {
        let api_key = config::resolve_api_key()?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: None,
        };

        tracing::debug!(model = %self.model, "Sending image request");
        let started = std::time::Instant::now();
        let response =
            gemini::send_generate_content(&self.client, &self.model, &api_key, &request).await?;
        tracing::debug!(
            model = %self.model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Image response received"
        );
        Ok(first_inline_image(response))
    }
}

impl Default for GeminiImageAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageProvider for GeminiImageAgent {
    async fn request_image(&self, prompt: &str) -> Option<DataUri> {
        match self.try_request(prompt).await {
            Ok(image) => image,
            Err(err) => {
                tracing::warn!("Image generation failed: {err}");
                None
            }
        }
    }
}

/// Order-preserving scan across candidates and their parts. The first part
/// carrying inline image data wins; later matches are ignored by design.
fn first_inline_image(response: GenerateContentResponse) -> Option<DataUri> {
    response
        .candidates?
        .into_iter()
        .filter_map(|candidate| candidate.content)
        .flat_map(|content| content.parts)
        .find_map(|part| part.inline_data)
        .map(|inline| DataUri::new(inline.mime_type, inline.data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::{Candidate, CandidateContent, InlineData, ResponsePart};

    fn image_part(mime: &str, data: &str) -> ResponsePart {
        ResponsePart {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime.to_string(),
                data: data.to_string(),
            }),
        }
    }

    fn text_part(text: &str) -> ResponsePart {
        ResponsePart {
            text: Some(text.to_string()),
            inline_data: None,
        }
    }

    fn candidate(parts: Vec<ResponsePart>) -> Candidate {
        Candidate {
            content: Some(CandidateContent { parts }),
        }
    }

    #[test]
    fn zero_candidates_is_absent_not_a_failure() {
        let response = GenerateContentResponse {
            candidates: Some(vec![]),
        };
        assert_eq!(first_inline_image(response), None);
        let response = GenerateContentResponse { candidates: None };
        assert_eq!(first_inline_image(response), None);
    }

    #[test]
    fn text_only_parts_yield_no_image() {
        let response = GenerateContentResponse {
            candidates: Some(vec![candidate(vec![text_part("just words")])]),
        };
        assert_eq!(first_inline_image(response), None);
    }

    #[test]
    fn first_image_part_wins_across_candidates() {
        let response = GenerateContentResponse {
            candidates: Some(vec![
                candidate(vec![text_part("caption")]),
                candidate(vec![
                    image_part("image/png", "AAAA"),
                    image_part("image/jpeg", "BBBB"),
                ]),
            ]),
        };
        let uri = first_inline_image(response).unwrap();
        assert_eq!(uri.as_str(), "data:image/png;base64,AAAA");
    }

    #[test]
    fn candidate_without_content_is_skipped() {
        let response = GenerateContentResponse {
            candidates: Some(vec![
                Candidate { content: None },
                candidate(vec![image_part("image/png", "AAAA")]),
            ]),
        };
        assert!(first_inline_image(response).is_some());
    }
}
