//! Configuration schema for prompt-enhancer

use crate::error::{EnhancerError, Result};
use crate::pattern::PatternType;
use crate::selector::StrategySelector;
use llm::LocalLlmConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct EnhancerConfig {
    /// Model server configuration
    pub server: ServerConfig,

    /// Model selection
    pub model: ModelConfig,

    /// Strategy selector tuning
    pub selector: SelectorConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Model-serving endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the Ollama server (supports ${VAR})
    pub base_url: String,

    /// Timeout for listing models, in seconds
    pub list_timeout_secs: u64,

    /// Timeout for a generation, in seconds
    pub generate_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: llm::DEFAULT_BASE_URL.to_string(),
            list_timeout_secs: 10,
            generate_timeout_secs: 90,
        }
    }
}

/// Which model to talk to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    /// Preferred model; when unset the first listed model is used (supports ${VAR})
    pub default: Option<String>,

    /// Model name used when the server cannot be reached for a listing
    pub manual_fallback: String,

    /// Model reported when the server is reachable but lists nothing
    pub empty_listing_default: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            default: None,
            manual_fallback: "llama3".to_string(),
            empty_listing_default: llm::DEFAULT_MODEL.to_string(),
        }
    }
}

/// Strategy selector tuning
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SelectorConfig {
    /// Prompts with more words than this go straight to ai_rewrite
    pub word_threshold: usize,

    /// Pattern used when the model's answer names nothing usable
    pub fallback: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            word_threshold: crate::selector::DEFAULT_WORD_THRESHOLD,
            fallback: crate::selector::DEFAULT_FALLBACK.as_str().to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,

    /// Log format: "compact", "pretty", "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl EnhancerConfig {
    /// Resolve environment variables in configuration values
    ///
    /// Supports ${VAR_NAME} syntax
    pub fn resolve_env_vars(&mut self) {
        self.server.base_url = Self::expand_env_var(&self.server.base_url);

        if let Some(ref model) = self.model.default {
            self.model.default = Some(Self::expand_env_var(model));
        }
    }

    /// Expand environment variable in a string
    ///
    /// Supports ${VAR_NAME} syntax; unknown variables are left as written
    fn expand_env_var(value: &str) -> String {
        match value.strip_prefix("${").and_then(|rest| rest.strip_suffix('}')) {
            Some(var_name) => std::env::var(var_name).unwrap_or_else(|_| value.to_string()),
            None => value.to_string(),
        }
    }

    /// Check values that serde cannot check
    pub fn validate(&self) -> Result<()> {
        if self.server.base_url.trim().is_empty() {
            return Err(EnhancerError::Config("server.base_url must not be empty".to_string()));
        }
        if self.server.list_timeout_secs == 0 || self.server.generate_timeout_secs == 0 {
            return Err(EnhancerError::Config("server timeouts must be at least 1 second".to_string()));
        }
        self.fallback_pattern()?;
        Ok(())
    }

    /// The selector fallback as a catalog pattern
    pub fn fallback_pattern(&self) -> Result<PatternType> {
        PatternType::from_id(&self.selector.fallback).ok_or_else(|| {
            EnhancerError::Config(format!(
                "selector.fallback '{}' is not a known pattern",
                self.selector.fallback
            ))
        })
    }

    /// Client configuration for the llm crate
    pub fn llm_config(&self) -> LocalLlmConfig {
        LocalLlmConfig::new(self.server.base_url.clone())
            .with_list_timeout(Duration::from_secs(self.server.list_timeout_secs))
            .with_generate_timeout(Duration::from_secs(self.server.generate_timeout_secs))
            .with_default_model(self.model.empty_listing_default.clone())
    }

    /// Strategy selector built from this configuration
    pub fn selector(&self) -> Result<StrategySelector> {
        Ok(StrategySelector::new()
            .with_word_threshold(self.selector.word_threshold)
            .with_fallback(self.fallback_pattern()?))
    }
}
