//! Ollama client implementation.
//!
//! Talks to the two endpoints the enhancer needs:
//! - `GET /api/tags` to list installed models
//! - `POST /api/generate` (non-streaming) to produce a completion
//!
//! # Example
//!
//! ```rust,ignore
//! use llm::local::OllamaClient;
//! use llm::{LocalLlmConfig, ModelClient};
//!
//! let client = OllamaClient::new(LocalLlmConfig::default())?;
//! let models = client.list_models().await;
//! let text = client.generate("Why is the sky blue?", "llama3").await?;
//! ```

use crate::client::{ModelClient, ModelInfo};
use crate::config::LocalLlmConfig;
use crate::error::{LlmError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

/// Ollama client for local LLM inference.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    config: LocalLlmConfig,
    client: Client,
}

impl OllamaClient {
    /// Create a new Ollama client with the given configuration.
    ///
    /// A bare `host[:port]` base URL (the `OLLAMA_HOST` form) gets `http://`.
    pub fn new(mut config: LocalLlmConfig) -> Result<Self> {
        config.base_url = normalize_base_url(&config.base_url)?;

        let client = Client::builder().build()?;
        Ok(Self { config, client })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &LocalLlmConfig {
        &self.config
    }

    /// Check if Ollama server is running.
    pub async fn check_health(&self) -> bool {
        let url = self.config.endpoint("/api/tags");
        match self
            .client
            .get(&url)
            .timeout(self.config.list_timeout)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// Fetch installed models, sorted by name.
    pub async fn fetch_models(&self) -> Result<Vec<ModelInfo>> {
        let url = self.config.endpoint("/api/tags");

        let response = self
            .client
            .get(&url)
            .timeout(self.config.list_timeout)
            .send()
            .await
            .map_err(LlmError::from_transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::ProviderError(format!(
                "Ollama API error {}: {}",
                status, error_text
            )));
        }

        let body = response.text().await.map_err(LlmError::from_transport)?;
        let tags: TagsResponse = serde_json::from_str(&body)
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let mut models: Vec<ModelInfo> = tags
            .models
            .into_iter()
            .map(|m| ModelInfo {
                name: m.name,
                size: m.size,
                modified_at: m.modified_at,
            })
            .collect();
        models.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(models)
    }

    async fn request_generation(&self, prompt: &str, model: &str) -> Result<String> {
        let url = self.config.endpoint("/api/generate");

        let req_body = GenerateRequest {
            model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .timeout(self.config.generate_timeout)
            .json(&req_body)
            .send()
            .await
            .map_err(LlmError::from_transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::ProviderError(format!(
                "Ollama API error {}: {}",
                status, error_text
            )));
        }

        let body = response.text().await.map_err(LlmError::from_transport)?;
        parse_generation(&body)
    }
}

/// Prefix a scheme when missing and check the result parses as a URL.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(LlmError::ConfigError("base_url must not be empty".to_string()));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    let url = reqwest::Url::parse(&candidate)
        .map_err(|e| LlmError::ConfigError(format!("invalid base_url '{}': {}", raw, e)))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(LlmError::ConfigError(format!(
            "invalid base_url '{}': expected an http(s) host",
            raw
        )));
    }

    Ok(candidate)
}

/// Extract the trimmed completion text from a `/api/generate` body.
fn parse_generation(body: &str) -> Result<String> {
    let resp: GenerateResponse =
        serde_json::from_str(body).map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

    resp.response
        .map(|text| text.trim().to_string())
        .ok_or_else(|| LlmError::InvalidResponse("No response from Ollama".to_string()))
}

#[async_trait]
impl ModelClient for OllamaClient {
    async fn list_models(&self) -> Vec<String> {
        match self.fetch_models().await {
            Ok(models) if models.is_empty() => {
                debug!(default = %self.config.default_model, "Ollama reported no models");
                vec![self.config.default_model.clone()]
            }
            Ok(models) => models.into_iter().map(|m| m.name).collect(),
            Err(e) => {
                warn!(
                    base_url = %self.config.base_url,
                    kind = e.kind(),
                    error = %e,
                    "Could not list Ollama models"
                );
                Vec::new()
            }
        }
    }

    async fn generate(&self, prompt: &str, model: &str) -> Result<String> {
        let started = Instant::now();
        let result = self.request_generation(prompt, model).await;

        match &result {
            Ok(text) => debug!(
                model,
                prompt_chars = prompt.len(),
                response_chars = text.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Ollama generation finished"
            ),
            Err(e) => warn!(
                model,
                kind = e.kind(),
                error = %e,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Ollama generation failed"
            ),
        }

        result
    }
}

// Ollama API types
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagsModel>,
}

#[derive(Debug, Deserialize)]
struct TagsModel {
    #[serde(default)]
    name: String,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    modified_at: Option<String>,
}
