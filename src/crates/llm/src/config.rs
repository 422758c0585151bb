//! Configuration for the local model-serving client.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Ollama endpoint.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Model reported when the server is reachable but has no models installed.
pub const DEFAULT_MODEL: &str = "llama3:latest";

/// Configuration for local LLM providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalLlmConfig {
    /// Base URL for the local LLM server, e.g. "http://localhost:11434".
    pub base_url: String,

    /// Timeout for `GET /api/tags`.
    #[serde(default = "default_list_timeout")]
    pub list_timeout: Duration,

    /// Timeout for `POST /api/generate`.
    #[serde(default = "default_generate_timeout")]
    pub generate_timeout: Duration,

    /// Identifier returned by model listing when the server has none.
    #[serde(default = "default_model")]
    pub default_model: String,
}

impl LocalLlmConfig {
    /// Create a new local LLM configuration.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            list_timeout: default_list_timeout(),
            generate_timeout: default_generate_timeout(),
            default_model: default_model(),
        }
    }

    /// Set the model listing timeout.
    pub fn with_list_timeout(mut self, timeout: Duration) -> Self {
        self.list_timeout = timeout;
        self
    }

    /// Set the generation timeout.
    pub fn with_generate_timeout(mut self, timeout: Duration) -> Self {
        self.generate_timeout = timeout;
        self
    }

    /// Set the model reported for an empty listing.
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Join an API path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl Default for LocalLlmConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

fn default_list_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_generate_timeout() -> Duration {
    Duration::from_secs(90)
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
