//! User configuration loaded from `config.toml`.

use crate::history::{DEFAULT_HISTORY_KEY, MAX_HISTORY};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub history: HistoryConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryConfig {
    /// Record committed results.
    pub enabled: bool,
    pub max_entries: usize,
    /// Storage key (and file name) of the persisted log.
    pub key: String,
    /// Override for the directory history is stored in.
    pub data_dir: Option<PathBuf>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: MAX_HISTORY,
            key: DEFAULT_HISTORY_KEY.to_string(),
            data_dir: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// `~/.config/pocketcalc/config.toml` on Linux.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("pocketcalc").join("config.toml"))
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => path,
            None => return Ok(Self::default()),
        };

        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.history.max_entries == 0 {
            anyhow::bail!("history.max_entries must be at least 1");
        }
        crate::storage::validate_key(&self.history.key)
            .context("history.key must only use letters, digits, '_', '-' and '.'")?;
        Ok(())
    }

    /// Where the history file lives.
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.history
            .data_dir
            .clone()
            .or_else(crate::storage::FileStorage::default_dir)
    }
}
