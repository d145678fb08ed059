//! Catalog configuration
//!
//! Loaded from a JSON file. Only `data_dir` is required:
//!
//! ```json
//! {
//!   "data_dir": "./catalog-data",
//!   "max_conflict_retries": 5,
//!   "deleted_entry_policy": "reject",
//!   "narrow_carried_closed_values": true,
//!   "log_level": "info"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::observability::Severity;
use crate::scope::DeletedEntryPolicy;
use crate::specification::CarryForwardPolicy;

/// Configuration errors
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config {0}: {1}")]
    Read(String, String),

    #[error("Invalid config JSON: {0}")]
    Parse(String),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Catalog engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Root directory for scopes, products and assets (required)
    pub data_dir: PathBuf,

    /// Attempts after a lost version-numbering race (default: 5)
    #[serde(default = "default_max_conflict_retries")]
    pub max_conflict_retries: u32,

    /// Whether deleted schema entries still validate new versions (default: reject)
    #[serde(default)]
    pub deleted_entry_policy: DeletedEntryPolicy,

    /// Drop carried-forward closed values the scope no longer has,
    /// instead of rejecting the update (default: true)
    #[serde(default = "default_narrow")]
    pub narrow_carried_closed_values: bool,

    /// Minimum log severity (default: info)
    #[serde(default = "default_log_level")]
    pub log_level: Severity,
}

fn default_max_conflict_retries() -> u32 {
    5
}

fn default_narrow() -> bool {
    true
}

fn default_log_level() -> Severity {
    Severity::Info
}

impl CatalogConfig {
    /// Create a config with defaults for everything but the data directory
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            max_conflict_retries: default_max_conflict_retries(),
            deleted_entry_policy: DeletedEntryPolicy::default(),
            narrow_carried_closed_values: default_narrow(),
            log_level: default_log_level(),
        }
    }

    /// Load and validate configuration from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.display().to_string(), e.to_string()))?;

        let config: CatalogConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("data_dir must not be empty".into()));
        }

        if self.max_conflict_retries == 0 {
            return Err(ConfigError::Invalid("max_conflict_retries must be > 0".into()));
        }

        Ok(())
    }

    pub fn carry_forward_policy(&self) -> CarryForwardPolicy {
        if self.narrow_carried_closed_values {
            CarryForwardPolicy::Narrow
        } else {
            CarryForwardPolicy::Reject
        }
    }

    pub fn scopes_dir(&self) -> PathBuf {
        self.data_dir.join("metadata").join("scopes")
    }

    pub fn products_dir(&self) -> PathBuf {
        self.data_dir.join("products")
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.data_dir.join("assets")
    }
}
