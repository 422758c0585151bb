//! Error types for the model-serving client.

use thiserror::Error;

/// Result type for LLM operations.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Errors that can occur when talking to the model-serving endpoint.
///
/// The variant is the failure kind; the payload is a human-readable message.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP request failed for a reason not covered by a more specific variant.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Provider service unavailable (e.g., Ollama not running).
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The endpoint answered, but not with the body we expected.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Request timeout.
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Non-success status from the provider.
    #[error("Provider error: {0}")]
    ProviderError(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl LlmError {
    /// Classify a transport-level `reqwest` failure.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout(err.to_string())
        } else if err.is_connect() {
            LlmError::ServiceUnavailable(err.to_string())
        } else if err.is_decode() {
            LlmError::InvalidResponse(err.to_string())
        } else {
            LlmError::HttpError(err)
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::HttpError(_) | LlmError::ServiceUnavailable(_) | LlmError::Timeout(_)
        )
    }

    /// Short label for the failure kind, used in logs and CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            LlmError::HttpError(_) => "http",
            LlmError::ServiceUnavailable(_) => "unavailable",
            LlmError::InvalidResponse(_) => "invalid_response",
            LlmError::Timeout(_) => "timeout",
            LlmError::ProviderError(_) => "provider",
            LlmError::ConfigError(_) => "config",
        }
    }

    /// Render the failure as displayable text in place of a generation.
    pub fn display_text(&self) -> String {
        format!("[Ollama Error: {}]", self)
    }
}
