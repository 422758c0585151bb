//! Shared state for CLI commands
//!
//! Loads the layered configuration, applies command-line overrides and builds
//! the Ollama client and enhancer every command works with.

use crate::config::{ConfigLoader, EnhancerConfig, ModelConfig};
use crate::enhancer::PromptEnhancer;
use crate::error::{EnhancerError, Result};
use llm::{ModelClient, OllamaClient};
use tracing::{debug, info};

/// Values given on the command line (or their environment variables)
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub model: Option<String>,
}

impl Overrides {
    /// Apply on top of a loaded configuration
    pub fn apply(&self, config: &mut EnhancerConfig) {
        if let Some(ref base_url) = self.base_url {
            config.server.base_url = base_url.clone();
        }
        if let Some(ref model) = self.model {
            config.model.default = Some(model.clone());
        }
    }
}

/// Everything a command needs to talk to the model server
pub struct CliContext {
    pub config: EnhancerConfig,
    pub enhancer: PromptEnhancer<OllamaClient>,
}

impl CliContext {
    /// Build from an already-resolved configuration
    pub fn from_config(config: EnhancerConfig) -> Result<Self> {
        let client = OllamaClient::new(config.llm_config())?;
        let enhancer = PromptEnhancer::new(client).with_selector(config.selector()?);

        info!(base_url = %config.server.base_url, "Model client ready");
        Ok(Self { config, enhancer })
    }

    pub fn client(&self) -> &OllamaClient {
        self.enhancer.client()
    }

    /// Model to use for this invocation
    pub async fn resolve_model(&self) -> String {
        resolve_model(self.client(), &self.config.model).await
    }
}

/// Layered configuration with command-line overrides applied
pub async fn effective_config(loader: &ConfigLoader, overrides: &Overrides) -> Result<EnhancerConfig> {
    let mut config = loader.load().await?;
    overrides.apply(&mut config);
    if overrides.base_url.is_some() {
        config.validate()?;
    }
    Ok(config)
}

/// Pick a model: configured/explicit default, then the first listed model,
/// then the manual fallback name.
pub async fn resolve_model<C>(client: &C, config: &ModelConfig) -> String
where
    C: ModelClient + ?Sized,
{
    if let Some(model) = config.default.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
        debug!(model, "Using configured model");
        return model.to_string();
    }

    match client.list_models().await.into_iter().next() {
        Some(model) => {
            debug!(model = %model, "Using first listed model");
            model
        }
        None => {
            debug!(model = %config.manual_fallback, "No models listed, using manual fallback");
            config.manual_fallback.clone()
        }
    }
}

/// Split a `key=value` parameter
pub fn parse_param(raw: &str) -> Result<(String, String)> {
    let (key, value) = raw.split_once('=').ok_or_else(|| {
        EnhancerError::InvalidInput(format!("parameter '{}' is not in key=value form", raw))
    })?;

    let key = key.trim();
    if key.is_empty() {
        return Err(EnhancerError::InvalidInput(format!(
            "parameter '{}' has an empty key",
            raw
        )));
    }

    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedClient;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_explicit_model_wins() {
        let client = ScriptedClient::new().with_models(["llama3:latest"]);
        let config = ModelConfig {
            default: Some("mistral".to_string()),
            ..ModelConfig::default()
        };

        assert_eq!(resolve_model(&client, &config).await, "mistral");
    }

    #[tokio::test]
    async fn test_first_listed_model() {
        let client = ScriptedClient::new().with_models(["codellama", "llama3:latest"]);
        assert_eq!(resolve_model(&client, &ModelConfig::default()).await, "codellama");
    }

    #[tokio::test]
    async fn test_manual_fallback_when_nothing_listed() {
        let client = ScriptedClient::new();
        assert_eq!(resolve_model(&client, &ModelConfig::default()).await, "llama3");
    }

    #[tokio::test]
    async fn test_blank_default_is_ignored() {
        let client = ScriptedClient::new().with_models(["phi3"]);
        let config = ModelConfig {
            default: Some("  ".to_string()),
            ..ModelConfig::default()
        };
        assert_eq!(resolve_model(&client, &config).await, "phi3");
    }

    #[tokio::test]
    async fn test_overrides_applied_over_files() {
        let temp_dir = TempDir::new().unwrap();
        let project = temp_dir.path().join("project.toml");
        tokio::fs::write(
            &project,
            "[server]\nbase_url = \"http://from-file:11434\"\n[model]\ndefault = \"phi3\"\n",
        )
        .await
        .unwrap();

        let loader = ConfigLoader::with_paths(None, project);
        let overrides = Overrides {
            base_url: Some("http://from-flag:11434".to_string()),
            model: None,
        };

        let config = effective_config(&loader, &overrides).await.unwrap();
        assert_eq!(config.server.base_url, "http://from-flag:11434");
        assert_eq!(config.model.default.as_deref(), Some("phi3"));
    }

    #[tokio::test]
    async fn test_empty_base_url_override_rejected() {
        let loader = ConfigLoader::with_paths(None, PathBuf::from("/nonexistent/config.toml"));
        let overrides = Overrides {
            base_url: Some(String::new()),
            model: None,
        };
        assert!(effective_config(&loader, &overrides).await.is_err());
    }

    #[test]
    fn test_context_from_default_config() {
        let context = CliContext::from_config(EnhancerConfig::default()).unwrap();
        assert_eq!(context.client().config().base_url, "http://localhost:11434");
        assert_eq!(context.enhancer.selector().word_threshold(), 15);
    }

    #[test]
    fn test_parse_param() {
        assert_eq!(
            parse_param("persona=data engineer").unwrap(),
            ("persona".to_string(), "data engineer".to_string())
        );
        assert_eq!(
            parse_param("expr=a=b").unwrap(),
            ("expr".to_string(), "a=b".to_string())
        );
        assert_eq!(parse_param("empty=").unwrap().1, "");
        assert!(parse_param("novalue").unwrap_err().is_usage_error());
        assert!(parse_param("=x").is_err());
    }
}
