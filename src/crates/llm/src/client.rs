//! The client seam shared by everything that talks to a model server.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Information about an available model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier/name, e.g. "llama3:latest".
    pub name: String,

    /// Size on disk in bytes, when the server reports it.
    pub size: Option<u64>,

    /// Last modification time as reported by the server.
    pub modified_at: Option<String>,
}

impl ModelInfo {
    /// Create a new ModelInfo with just a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: None,
            modified_at: None,
        }
    }

    /// Size in gigabytes, if known.
    pub fn size_gb(&self) -> Option<f64> {
        self.size.map(|bytes| bytes as f64 / 1_000_000_000.0)
    }
}

/// Request/response operations against a model-serving endpoint.
///
/// Implementations hold no mutable state beyond a connection handle, so a
/// single client may be shared between sessions.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Names of the models the server offers.
    ///
    /// Never fails: an unreachable server yields an empty list, and a
    /// reachable server with nothing installed yields a single default name.
    async fn list_models(&self) -> Vec<String>;

    /// Generate a completion for `prompt` with `model`, trimmed of
    /// surrounding whitespace.
    async fn generate(&self, prompt: &str, model: &str) -> Result<String>;
}

#[async_trait]
impl<T: ModelClient + ?Sized> ModelClient for Arc<T> {
    async fn list_models(&self) -> Vec<String> {
        (**self).list_models().await
    }

    async fn generate(&self, prompt: &str, model: &str) -> Result<String> {
        (**self).generate(prompt, model).await
    }
}
