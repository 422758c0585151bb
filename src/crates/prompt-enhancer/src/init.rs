//! First-time setup
//!
//! Writes a commented default configuration to the user-level location.

use crate::error::{EnhancerError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuration directory name, both in the home directory and in a project
pub const CONFIG_DIR: &str = ".prompt-enhancer";

/// Configuration file name
pub const CONFIG_FILE: &str = "config.toml";

/// What `initialize` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    Created(PathBuf),
    Overwritten(PathBuf),
    AlreadyExists(PathBuf),
}

impl InitOutcome {
    pub fn path(&self) -> &Path {
        match self {
            InitOutcome::Created(p) | InitOutcome::Overwritten(p) | InitOutcome::AlreadyExists(p) => p,
        }
    }
}

/// Get the user configuration directory (~/.prompt-enhancer)
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined
pub fn config_home() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_DIR))
        .ok_or_else(|| EnhancerError::Config("Could not determine home directory".to_string()))
}

/// Get the path to the user-level configuration file
pub fn user_config_path() -> Result<PathBuf> {
    Ok(config_home()?.join(CONFIG_FILE))
}

/// Get the path to the project-level configuration file
pub fn project_config_path() -> PathBuf {
    PathBuf::from(".").join(CONFIG_DIR).join(CONFIG_FILE)
}

/// Write the default configuration to ~/.prompt-enhancer/config.toml
///
/// An existing file is left alone unless `force` is set.
pub fn initialize(force: bool) -> Result<InitOutcome> {
    initialize_at(&config_home()?, force)
}

/// Write the default configuration into `dir`
pub fn initialize_at(dir: &Path, force: bool) -> Result<InitOutcome> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .map_err(|e| EnhancerError::Config(format!("Failed to create directory: {}", e)))?;
        info!(path = %dir.display(), "Created configuration directory");
    }

    let config_path = dir.join(CONFIG_FILE);
    let existed = config_path.exists();

    if existed && !force {
        warn!(path = %config_path.display(), "Configuration already exists (use --force to overwrite)");
        return Ok(InitOutcome::AlreadyExists(config_path));
    }

    create_default_config(&config_path)?;
    info!(path = %config_path.display(), "Wrote default configuration");

    Ok(if existed {
        InitOutcome::Overwritten(config_path)
    } else {
        InitOutcome::Created(config_path)
    })
}

fn create_default_config(path: &Path) -> Result<()> {
    fs::write(path, DEFAULT_CONFIG)
        .map_err(|e| EnhancerError::Config(format!("Failed to write configuration: {}", e)))
}

const DEFAULT_CONFIG: &str = r#"# prompt-enhancer configuration
#
# User-level settings. Per-project overrides go in ./.prompt-enhancer/config.toml

[server]
# Ollama base URL (environment variables like ${OLLAMA_HOST} are expanded)
base_url = "http://localhost:11434"

# Seconds to wait for the model listing
list_timeout_secs = 10

# Seconds to wait for a single generation
generate_timeout_secs = 90

[model]
# Model to use; when unset the first model the server lists is used
# default = "llama3:latest"

# Model name used when the server cannot be reached for a listing
manual_fallback = "llama3"

# Model reported when the server is reachable but has no models
empty_listing_default = "llama3:latest"

[selector]
# Prompts with more words than this are sent straight to ai_rewrite
word_threshold = 15

# Pattern used when the model's classification names nothing usable
fallback = "xml_structure"

[logging]
# Log level: "trace", "debug", "info", "warn", "error"
level = "warn"

# Log format: "compact", "pretty", "json"
format = "compact"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnhancerConfig;
    use tempfile::TempDir;

    #[test]
    fn test_config_paths() {
        assert!(project_config_path().ends_with(".prompt-enhancer/config.toml"));
        if let Ok(path) = user_config_path() {
            assert!(path.to_string_lossy().contains(CONFIG_DIR));
        }
    }

    #[test]
    fn test_default_config_parses_to_defaults() {
        let parsed: EnhancerConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(parsed, EnhancerConfig::default());
    }

    #[test]
    fn test_initialize_creates_then_keeps() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join(CONFIG_DIR);

        let first = initialize_at(&dir, false).unwrap();
        assert!(matches!(first, InitOutcome::Created(_)));
        assert!(first.path().exists());

        fs::write(first.path(), "[selector]\nword_threshold = 3\n").unwrap();

        let second = initialize_at(&dir, false).unwrap();
        assert!(matches!(second, InitOutcome::AlreadyExists(_)));
        let content = fs::read_to_string(second.path()).unwrap();
        assert!(content.contains("word_threshold = 3"));
    }

    #[test]
    fn test_initialize_force_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().to_path_buf();
        fs::write(dir.join(CONFIG_FILE), "junk").unwrap();

        let outcome = initialize_at(&dir, true).unwrap();

        assert!(matches!(outcome, InitOutcome::Overwritten(_)));
        let content = fs::read_to_string(outcome.path()).unwrap();
        assert!(content.contains("[server]"));
        assert!(content.contains("[model]"));
        assert!(content.contains("[selector]"));
        assert!(content.contains("[logging]"));
    }
}
