//! Provider seams and the data-URI image value they exchange.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::{ManifoldError, Result};

/// A self-contained `data:<mime>;base64,<payload>` encoding of binary image
/// data, usable directly as an image source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataUri(String);

impl DataUri {
    /// Builds a data URI from a MIME type and an already-base64-encoded payload.
    pub fn new(mime: impl AsRef<str>, base64_payload: impl AsRef<str>) -> Self {
        Self(format!(
            "data:{};base64,{}",
            mime.as_ref(),
            base64_payload.as_ref()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Declared MIME type, e.g. `image/png`.
    pub fn mime(&self) -> &str {
        let rest = self.0.strip_prefix("data:").unwrap_or(&self.0);
        rest.split(';').next().unwrap_or("")
    }

    fn payload(&self) -> &str {
        self.0.rsplit(',').next().unwrap_or("")
    }

    /// Approximate size of the decoded image in bytes.
    pub fn approx_bytes(&self) -> usize {
        self.payload().len() * 3 / 4
    }

    /// Decodes the base64 payload back to raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        BASE64_STANDARD
            .decode(self.payload())
            .map_err(|err| ManifoldError::internal(format!("Invalid base64 image payload: {err}")))
    }
}

impl std::fmt::Display for DataUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Text-analysis provider seam.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Requests the Markdown analysis for an already-built prompt.
    async fn request_analysis(&self, prompt: &str) -> Result<String>;
}

/// Image-generation provider seam.
///
/// The signature has no error channel at all. Image generation is
/// best-effort and must never fail the session, so implementations absorb
/// their own failures and return `None`.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn request_image(&self, prompt: &str) -> Option<DataUri>;
}
