//! Configuration management for prompt-enhancer
//!
//! Supports dual-location configuration:
//! - User-level: ~/.prompt-enhancer/config.toml
//! - Project-level: ./.prompt-enhancer/config.toml
//!
//! Project-level config overrides user-level config. Command-line flags are
//! applied on top by the CLI.

mod loader;
mod schema;

pub use loader::ConfigLoader;
pub use schema::{EnhancerConfig, LoggingConfig, ModelConfig, SelectorConfig, ServerConfig};

use crate::Result;

/// Load configuration from both locations with project config taking precedence
///
/// Priority order:
/// 1. Default values
/// 2. User-level config (~/.prompt-enhancer/config.toml)
/// 3. Project-level config (./.prompt-enhancer/config.toml)
pub async fn load_config() -> Result<EnhancerConfig> {
    ConfigLoader::new().load().await
}
