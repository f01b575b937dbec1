//! Credential resolution for the Gemini API.
//!
//! The key is read from the `GEMINI_API_KEY` environment variable first and
//! falls back to `~/.config/manifold/secret.json`. Resolution happens at call
//! time; a missing credential is a fatal precondition failure for that call,
//! not a retryable condition.

use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use manifold_core::{ManifoldError, Result};

/// Environment variable consulted before the secret file.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Root structure of secret.json
#[derive(Debug, Clone, Deserialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub gemini: Option<GeminiSecret>,
}

/// Gemini API credential section
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSecret {
    pub api_key: String,
}

/// Resolves the Gemini API key.
///
/// Error messages name the locations that were checked but never contain
/// key material.
pub fn resolve_api_key() -> Result<String> {
    if let Ok(key) = std::env::var(API_KEY_ENV) {
        if !key.trim().is_empty() {
            return Ok(key);
        }
    }

    let path = secret_file_path()?;
    if !path.exists() {
        return Err(ManifoldError::config(format!(
            "{API_KEY_ENV} is not set and no secret file was found at {}",
            path.display()
        )));
    }

    let content = fs::read_to_string(&path).map_err(|e| {
        ManifoldError::config(format!(
            "Failed to read secret file at {}: {}",
            path.display(),
            e
        ))
    })?;

    let config = parse_secret_config(&content, &path)?;
    config
        .gemini
        .map(|gemini| gemini.api_key)
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            ManifoldError::config(format!(
                "No Gemini API key found in secret file at {}",
                path.display()
            ))
        })
}

fn parse_secret_config(content: &str, path: &std::path::Path) -> Result<SecretConfig> {
    serde_json::from_str(content).map_err(|e| {
        ManifoldError::config(format!(
            "Failed to parse secret file at {}: {}",
            path.display(),
            e
        ))
    })
}

/// Returns the path to the secret file: ~/.config/manifold/secret.json
fn secret_file_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ManifoldError::config("Could not determine home directory"))?;
    Ok(home.join(".config").join("manifold").join("secret.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_secret_file_with_gemini_section() {
        let path = PathBuf::from("secret.json");
        let config =
            parse_secret_config(r#"{"gemini": {"api_key": "test-key"}}"#, &path).unwrap();
        assert_eq!(config.gemini.unwrap().api_key, "test-key");
    }

    #[test]
    fn tolerates_missing_gemini_section() {
        let path = PathBuf::from("secret.json");
        let config = parse_secret_config("{}", &path).unwrap();
        assert!(config.gemini.is_none());
    }

    #[test]
    fn malformed_secret_file_is_a_config_error() {
        let path = PathBuf::from("secret.json");
        let err = parse_secret_config("not json", &path).unwrap_err();
        assert!(err.is_config());
    }
}
