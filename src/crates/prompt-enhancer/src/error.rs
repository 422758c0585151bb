//! Error types for prompt-enhancer
//!
//! Provides a unified error type for all enhancer operations.

use llm::LlmError;
use std::fmt;

/// Result type alias for enhancer operations
pub type Result<T> = std::result::Result<T, EnhancerError>;

/// Main error type for enhancer operations
#[derive(Debug)]
pub enum EnhancerError {
    /// Configuration error
    Config(String),

    /// A template placeholder had no value supplied
    MissingParameter { pattern: String, placeholder: String },

    /// Malformed `key=value` parameter or template syntax
    InvalidInput(String),

    /// Model-serving failure
    Llm(LlmError),

    /// IO error
    Io(std::io::Error),

    /// Serialization/deserialization error
    Serde(serde_json::Error),
}

impl EnhancerError {
    /// True for caller mistakes (as opposed to runtime or network conditions).
    pub fn is_usage_error(&self) -> bool {
        matches!(self, Self::MissingParameter { .. } | Self::InvalidInput(_))
    }
}

impl fmt::Display for EnhancerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::MissingParameter { pattern, placeholder } => write!(
                f,
                "Pattern '{}' needs a value for '{}' (pass --param {}=...)",
                pattern, placeholder, placeholder
            ),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::Llm(err) => write!(f, "LLM error: {}", err),
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::Serde(err) => write!(f, "Serialization error: {}", err),
        }
    }
}

impl std::error::Error for EnhancerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Llm(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Serde(err) => Some(err),
            _ => None,
        }
    }
}

// Conversions from common error types
impl From<LlmError> for EnhancerError {
    fn from(err: LlmError) -> Self {
        Self::Llm(err)
    }
}

impl From<std::io::Error> for EnhancerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for EnhancerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_parameter_message() {
        let err = EnhancerError::MissingParameter {
            pattern: "role_prompting".to_string(),
            placeholder: "persona".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("role_prompting"));
        assert!(msg.contains("--param persona="));
        assert!(err.is_usage_error());
    }

    #[test]
    fn test_llm_error_is_not_usage_error() {
        let err: EnhancerError = LlmError::Timeout("90s".into()).into();
        assert!(!err.is_usage_error());
        assert!(std::error::Error::source(&err).is_some());
    }
}
