//! Generation provider configuration.
//!
//! # Invariants
//! - Credentials are injected by the caller; none are compiled in.
//! - `Debug` output never contains the api key.

use std::fmt::{Debug, Formatter};
use std::time::Duration;

pub const DEFAULT_GENERATION_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GENERATION_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection settings for the generative-text provider.
#[derive(Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    pub api_key: Option<String>,
    pub model: String,
    /// Base URL without trailing slash, e.g. `.../v1beta`.
    pub endpoint: String,
    pub timeout: Duration,
}

impl GenerationConfig {
    /// Default provider settings with the given credential.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            model: DEFAULT_GENERATION_MODEL.to_string(),
            endpoint: DEFAULT_GENERATION_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Full `generateContent` URL; carries no credential.
    pub fn generate_content_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

impl Debug for GenerationConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::GenerationConfig;

    #[test]
    fn blank_key_counts_as_missing() {
        assert_eq!(GenerationConfig::new(Some("  ".to_string())).api_key, None);
    }

    #[test]
    fn url_is_built_from_endpoint_and_model_without_key() {
        let config = GenerationConfig::new(Some("secret".to_string()))
            .with_endpoint("http://localhost:9000/v1/")
            .with_model("test-model");
        assert_eq!(
            config.generate_content_url(),
            "http://localhost:9000/v1/models/test-model:generateContent"
        );
        assert!(!config.generate_content_url().contains("secret"));
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = GenerationConfig::new(Some("secret".to_string()));
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
