//! # prompt-enhancer
//!
//! Rewrites user prompts into more effective ones with the help of a model
//! running on a local Ollama server.
//!
//! ## Features
//!
//! - **Pattern Catalog** - Five enhancement patterns: four fixed templates and
//!   an AI-driven critique-and-rewrite
//! - **Strategy Selection** - Long prompts go to `ai_rewrite`; shorter ones are
//!   classified by the model
//! - **Sessions** - History of template enhancements and the last critique,
//!   kept per user
//! - **Dual-Location Config** - User-level and project-level TOML files
//! - **CLI** - One-shot commands and an interactive session
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use llm::{LocalLlmConfig, OllamaClient};
//! use prompt_enhancer::{PromptEnhancer, Session};
//! use std::collections::BTreeMap;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = OllamaClient::new(LocalLlmConfig::default())?;
//! let enhancer = PromptEnhancer::new(client);
//! let mut session = Session::new();
//!
//! let run = enhancer
//!     .run(&mut session, "Explain recursion", &BTreeMap::new(), "llama3", false)
//!     .await?;
//! println!("{}: {}", run.selection.pattern, run.enhancement.prompt);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod enhancer;
pub mod init;
pub mod logging;
pub mod pattern;
pub mod selector;
pub mod session;
pub mod template;
pub mod testing;
pub mod version;

// Error types and utilities
mod error;

// Re-export key types for convenience
pub use enhancer::{Enhancement, EnhancementRun, PromptEnhancer};
pub use pattern::{Pattern, PatternCatalog, PatternType};
pub use selector::{Selection, SelectionReason, StrategySelector};
pub use session::{EnhancementRecord, Session};

// Error types
pub use error::{EnhancerError, Result};

// Re-export version utilities
pub use version::{full_version as version_info, VersionInfo};

// Re-export config types
pub use config::{load_config, ConfigLoader, EnhancerConfig};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_info() {
        let info = version_info();
        assert!(info.contains("prompt-enhancer"));
        assert!(info.contains(version::VERSION));
    }
}
