//! Engine and runtime configuration.
//!
//! Every section and field has a default, so an empty file is a valid
//! configuration.
//!
//! ```toml
//! [engine]
//! include_records = true
//! include_user_count = true
//!
//! [engine.include_relations]
//! media = false
//!
//! [engine.recent]
//! tradition = 3
//! overall_cap = 5
//!
//! [runtime]
//! workers = 4
//! queue_capacity = 256
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aggregate::RecentActivityConfig;
use crate::record::Relations;
use crate::runtime::ReportRuntimeConfig;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// What the report engine computes and includes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Include the filtered record collections in the report.
    pub include_records: bool,
    /// Nested lookups carried by the included records.
    pub include_relations: Relations,
    /// Ask the user-count provider, when one is configured.
    pub include_user_count: bool,
    /// Recent activity caps.
    pub recent: RecentActivityConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            include_records: true,
            include_relations: Relations::ALL,
            include_user_count: true,
            recent: RecentActivityConfig::default(),
        }
    }
}

/// File-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub runtime: ReportRuntimeConfig,
}

impl Config {
    /// Parses configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}
