// User configuration loaded from YAML

use crate::task::DEFAULT_MAX_TEXT_LEN;
use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings for the interactive front end and the store's text limit
///
/// Only settings live here; task data is never written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum task text length in characters
    pub max_text_len: usize,
    /// Ask before removing a task
    pub confirm_delete: bool,
    pub color: bool,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_text_len: DEFAULT_MAX_TEXT_LEN,
            confirm_delete: true,
            color: true,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load config from an explicit path, or the default location if `None`
    ///
    /// An explicit path must exist. A missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(eyre!("Config file not found: {}", path.display()));
                }
                Self::load_from_path(path)
            }
            None => match default_path() {
                Some(path) if path.exists() => Self::load_from_path(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Load config from a given path; an empty file yields defaults
    pub fn load_from_path(path: &Path) -> Result<Self> {
        debug!(path = ?path, "Loading config");

        let contents = fs::read_to_string(path).context("Failed to read config file")?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&contents).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.max_text_len == 0 {
            return Err(eyre!("max_text_len must be at least 1"));
        }
        Ok(())
    }
}

/// Platform config location: `<config_dir>/todostore/todostore.yml`
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("todostore").join("todostore.yml"))
}
