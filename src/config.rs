//! Configuration with user-file and environment variable loading.
//!
//! Sources, later ones winning:
//! - built-in defaults
//! - `~/.config/twig/config.json` (platform config dir)
//! - `TWIG_METADATA_DIR`, `TWIG_COMPRESSION_LEVEL`, `TWIG_DEFAULT_BRANCH`

use crate::store::compress::DEFAULT_LEVEL;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Repository configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name of the metadata directory under the repository root
    pub metadata_dir: String,
    /// zlib level for new objects (0-9)
    pub compression_level: u32,
    /// Branch HEAD points at after `init`
    pub default_branch: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            metadata_dir: ".git".to_string(),
            compression_level: DEFAULT_LEVEL,
            default_branch: "main".to_string(),
        }
    }
}

impl Config {
    /// Load from the user config file (if any), then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match user_config_path() {
            Some(path) if path.is_file() => Self::from_file(&path)?,
            _ => Config::default(),
        };
        config.apply_env(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// Load from a JSON file; missing keys take their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Config = serde_json::from_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("TWIG_METADATA_DIR") {
            self.metadata_dir = dir;
        }
        if let Some(level) = lookup("TWIG_COMPRESSION_LEVEL") {
            self.compression_level = level.trim().parse().map_err(|_| {
                Error::Config(format!("Invalid TWIG_COMPRESSION_LEVEL: {}", level))
            })?;
        }
        if let Some(branch) = lookup("TWIG_DEFAULT_BRANCH") {
            self.default_branch = branch;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.compression_level > 9 {
            return Err(Error::Config(format!(
                "compression_level must be 0-9, got {}",
                self.compression_level
            )));
        }
        if matches!(self.metadata_dir.as_str(), "" | "." | "..")
            || self.metadata_dir.contains(|c: char| c == '/' || c == '\\')
        {
            return Err(Error::Config(format!(
                "metadata_dir must be a single path component, got {:?}",
                self.metadata_dir
            )));
        }
        if self.default_branch.is_empty() {
            return Err(Error::Config("default_branch must not be empty".into()));
        }
        Ok(())
    }
}

/// Location of the per-user config file
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("twig").join("config.json"))
}
