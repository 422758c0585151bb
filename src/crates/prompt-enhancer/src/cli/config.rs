//! `config` and `init` command handlers

use crate::config::{ConfigLoader, EnhancerConfig};
use crate::error::{EnhancerError, Result};
use crate::init::{self, InitOutcome};
use colored::Colorize;

/// Handle config command: print the effective configuration as TOML
///
/// The layer locations go to stderr so stdout can be redirected into a file.
pub fn handle_show(loader: &ConfigLoader, config: &EnhancerConfig) -> Result<()> {
    for (label, path, exists) in [
        (
            "user",
            loader.user_config_path().map(|p| p.display().to_string()),
            loader.user_config_exists(),
        ),
        (
            "project",
            Some(loader.project_config_path().display().to_string()),
            loader.project_config_exists(),
        ),
    ] {
        let path = path.unwrap_or_else(|| "(no home directory)".to_string());
        let state = if exists { "loaded".green() } else { "not found".dimmed() };
        eprintln!("# {} config: {} ({})", label, path, state);
    }

    println!("{}", render_config(config)?);
    Ok(())
}

/// Configuration as TOML text
pub fn render_config(config: &EnhancerConfig) -> Result<String> {
    toml::to_string_pretty(config)
        .map_err(|e| EnhancerError::Config(format!("Failed to encode config: {}", e)))
}

/// Handle init command
pub fn handle_init(force: bool) -> Result<()> {
    match init::initialize(force)? {
        InitOutcome::Created(path) => {
            println!("{}", "✓ Configuration created".green().bold());
            println!("  {}", path.display());
        }
        InitOutcome::Overwritten(path) => {
            println!("{}", "✓ Configuration reset to defaults".green().bold());
            println!("  {}", path.display());
        }
        InitOutcome::AlreadyExists(path) => {
            println!("{}", "Configuration already exists".yellow());
            println!("  {}", path.display());
            println!("  Use --force to overwrite it with defaults.");
        }
    }
    Ok(())
}
