//! Local LLM provider implementations.
//!
//! Providers in this module talk to a model server on localhost or the local
//! network and need no API key.

pub mod ollama;

pub use ollama::OllamaClient;
