//! Configuration file handling for the serialization core.
//!
//! This module provides loading and parsing of `.blog_core.json` configuration
//! files. The only tunable today is the hard depth cap that no schema may
//! exceed regardless of its own declared `max_depth`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hard cap applied to every schema's `max_depth` unless configured otherwise.
pub const DEFAULT_HARD_MAX_DEPTH: u32 = 10;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "Configuration file not found: {path}\n\n\
         Please create a .blog_core.json file, for example:\n\
         {{\n  \"hard_max_depth\": 10\n}}\n"
    )]
    NotFound { path: String },

    #[error("Failed to read {path}: {message}")]
    ReadFailed { path: String, message: String },

    #[error("Invalid JSON in {path}: {message}")]
    InvalidJson { path: String, message: String },
}

/// Core configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Upper bound on any schema's `max_depth`
    #[serde(default = "default_hard_max_depth")]
    pub hard_max_depth: u32,
}

fn default_hard_max_depth() -> u32 {
    DEFAULT_HARD_MAX_DEPTH
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            hard_max_depth: DEFAULT_HARD_MAX_DEPTH,
        }
    }
}

impl CoreConfig {
    /// Load configuration from `.blog_core.json` in the current directory.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(".blog_core.json"))
    }

    /// Load configuration from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file doesn't exist, cannot be read, or does
    /// not contain valid JSON.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidJson {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}
