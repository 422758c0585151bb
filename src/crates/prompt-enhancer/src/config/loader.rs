//! Configuration loader with dual-location support
//!
//! Loads configuration from:
//! 1. Default values
//! 2. User-level config: ~/.prompt-enhancer/config.toml
//! 3. Project-level config: ./.prompt-enhancer/config.toml
//!
//! Later layers override earlier ones key by key, so a project file that sets
//! only `[selector] word_threshold` keeps every other value from the layers
//! below it.

use crate::config::schema::EnhancerConfig;
use crate::error::{EnhancerError, Result};
use crate::init;
use std::path::{Path, PathBuf};
use tokio::fs;
use toml::{Table, Value};
use tracing::{debug, info};

/// Configuration loader that handles both user and project configs
pub struct ConfigLoader {
    user_config_path: Option<PathBuf>,
    project_config_path: PathBuf,
}

impl ConfigLoader {
    /// Create a loader for the standard locations
    ///
    /// When the home directory cannot be determined the user layer is skipped.
    pub fn new() -> Self {
        Self {
            user_config_path: init::user_config_path().ok(),
            project_config_path: init::project_config_path(),
        }
    }

    /// Create a loader for explicit locations
    pub fn with_paths(user_config_path: Option<PathBuf>, project_config_path: PathBuf) -> Self {
        Self {
            user_config_path,
            project_config_path,
        }
    }

    /// Load configuration from both locations with project taking precedence
    ///
    /// Missing files are skipped. A file that exists but cannot be read or
    /// parsed is an error.
    pub async fn load(&self) -> Result<EnhancerConfig> {
        let mut merged = Self::table_from(&EnhancerConfig::default())?;
        debug!("Loading configuration with defaults");

        if let Some(ref user_path) = self.user_config_path {
            if let Some(user_table) = self.read_layer(user_path).await? {
                debug!(path = %user_path.display(), "Loaded user-level config");
                merge_tables(&mut merged, user_table);
            }
        }

        if let Some(project_table) = self.read_layer(&self.project_config_path).await? {
            debug!(path = %self.project_config_path.display(), "Loaded project-level config");
            merge_tables(&mut merged, project_table);
        }

        let mut config: EnhancerConfig = Value::Table(merged)
            .try_into()
            .map_err(|e| EnhancerError::Config(format!("Failed to parse config: {}", e)))?;

        config.resolve_env_vars();
        config.validate()?;

        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load a single file on top of the defaults
    pub async fn load_from_path(&self, path: &Path) -> Result<EnhancerConfig> {
        let table = self.read_layer(path).await?.ok_or_else(|| {
            EnhancerError::Config(format!("Config file not found: {}", path.display()))
        })?;

        let mut merged = Self::table_from(&EnhancerConfig::default())?;
        merge_tables(&mut merged, table);

        Value::Table(merged)
            .try_into()
            .map_err(|e| EnhancerError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Read one layer as a raw table; `None` when the file does not exist
    async fn read_layer(&self, path: &Path) -> Result<Option<Table>> {
        if !path.exists() {
            debug!(path = %path.display(), "Config layer not present");
            return Ok(None);
        }

        let content = fs::read_to_string(path).await.map_err(|e| {
            EnhancerError::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        let table: Table = toml::from_str(&content).map_err(|e| {
            EnhancerError::Config(format!("Failed to parse config {}: {}", path.display(), e))
        })?;

        Ok(Some(table))
    }

    fn table_from(config: &EnhancerConfig) -> Result<Table> {
        match Value::try_from(config) {
            Ok(Value::Table(table)) => Ok(table),
            Ok(_) => Err(EnhancerError::Config("Default config is not a table".to_string())),
            Err(e) => Err(EnhancerError::Config(format!("Failed to encode defaults: {}", e))),
        }
    }

    /// Get user config path, if a home directory is known
    pub fn user_config_path(&self) -> Option<&Path> {
        self.user_config_path.as_deref()
    }

    /// Get project config path
    pub fn project_config_path(&self) -> &Path {
        &self.project_config_path
    }

    /// Check if user config exists
    pub fn user_config_exists(&self) -> bool {
        self.user_config_path.as_ref().is_some_and(|p| p.exists())
    }

    /// Check if project config exists
    pub fn project_config_exists(&self) -> bool {
        self.project_config_path.exists()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Overlay `overlay` onto `base`; nested tables merge, everything else replaces
fn merge_tables(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        match value {
            Value::Table(overlay_child) => match base.get_mut(&key) {
                Some(Value::Table(base_child)) => merge_tables(base_child, overlay_child),
                _ => {
                    base.insert(key, Value::Table(overlay_child));
                }
            },
            other => {
                base.insert(key, other);
            }
        }
    }
}
