//! Error types for the Manifold application.

use thiserror::Error;

/// A shared error type for the entire Manifold application.
///
/// Image generation deliberately has no variant here: the image path cannot
/// fail a session, so its provider trait returns `Option` instead of `Result`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManifoldError {
    /// Configuration error (missing or unreadable credential)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Text provider call failed (transport, HTTP status, or malformed body)
    #[error("Provider error: {message}")]
    Provider {
        /// HTTP status code when the provider answered with one
        status: Option<u16>,
        message: String,
    },

    /// User supplied an empty (or whitespace-only) topic
    #[error("Topic must not be empty")]
    EmptyTopic,

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ManifoldError {
    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Provider error without an HTTP status
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            status: None,
            message: message.into(),
        }
    }

    /// Creates a Provider error carrying the HTTP status the provider returned
    pub fn provider_with_status(status: u16, message: impl Into<String>) -> Self {
        Self::Provider {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if this is a provider error
    pub fn is_provider(&self) -> bool {
        matches!(self, Self::Provider { .. })
    }
}

impl From<std::io::Error> for ManifoldError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

/// A type alias for `Result<T, ManifoldError>`.
pub type Result<T> = std::result::Result<T, ManifoldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_display_shows_message_not_status() {
        let err = ManifoldError::provider_with_status(503, "service unavailable");
        assert_eq!(err.to_string(), "Provider error: service unavailable");
        assert!(err.is_provider());
    }

    #[test]
    fn config_error_is_detectable() {
        let err = ManifoldError::config("GEMINI_API_KEY is not set");
        assert!(err.is_config());
        assert!(!err.is_provider());
    }

    #[test]
    fn io_error_converts_with_kind() {
        let err: ManifoldError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert!(err.to_string().contains("NotFound"));
    }
}
