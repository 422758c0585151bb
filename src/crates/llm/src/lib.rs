//! Client for a locally running model server.
//!
//! The enhancer only needs two operations from a model server: list the
//! installed models and generate a completion. Both are expressed by the
//! [`ModelClient`] trait so callers can swap in a scripted client in tests.
//!
//! # Local Providers
//!
//! - **Ollama** - `GET /api/tags` and non-streaming `POST /api/generate`
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use llm::local::OllamaClient;
//! use llm::{LocalLlmConfig, ModelClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OllamaClient::new(LocalLlmConfig::new("http://localhost:11434"))?;
//!
//!     for model in client.list_models().await {
//!         println!("{}", model);
//!     }
//!
//!     match client.generate("What is Rust?", "llama3").await {
//!         Ok(text) => println!("{}", text),
//!         Err(e) => eprintln!("{}", e.display_text()),
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;

#[cfg(feature = "local")]
pub mod local;

// Re-export commonly used types
pub use client::{ModelClient, ModelInfo};
pub use config::{LocalLlmConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use error::{LlmError, Result};

#[cfg(feature = "local")]
pub use local::OllamaClient;
