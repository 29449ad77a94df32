//! Board configuration loaded from `config.toml` with CLI overrides.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use task_board_core::{Priority, TaskStatus};
use task_board_store::validate_key;

/// Application directory name under the platform config and data dirs.
pub const APP_DIR: &str = "task-board";
const CONFIG_FILE: &str = "config.toml";
/// Storage name used when the configuration does not override it.
pub const DEFAULT_STORAGE_KEY: &str = "task-storage";

/// Top-level configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoardConfig {
    /// Where and under which name the board is stored.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Field defaults for newly created tasks.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

impl BoardConfig {
    /// Default configuration file location (`<config_dir>/task-board/config.toml`).
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from `path`, or the default location when `path` is `None`.
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    /// Returns an error when the file exists but cannot be read, parsed or validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::default_path().map_or_else(|| Ok(Self::default()), |path| Self::from_path(&path)),
        }
    }

    /// Load from an explicit file. A missing file yields the default configuration.
    ///
    /// # Errors
    /// Returns an error when the file exists but cannot be read, parsed or validated.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents =
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&contents).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Parse and validate TOML text.
    ///
    /// # Errors
    /// Returns an error when the text is not valid configuration.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.storage.key.trim().is_empty() {
            bail!("storage.key must not be empty");
        }
        validate_key(&self.storage.key).context("storage.key may only contain [A-Za-z0-9._-]")?;
        Ok(())
    }
}

/// `[storage]` block.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Data directory; defaults to `<data_dir>/task-board`.
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// Storage name of the board record.
    #[serde(default = "default_storage_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            key: default_storage_key(),
        }
    }
}

impl StorageConfig {
    /// Resolve the data directory, preferring `override_dir`, then the configured one.
    ///
    /// # Errors
    /// Returns an error when no directory is configured and the platform has no data dir.
    pub fn resolve_dir(&self, override_dir: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = override_dir {
            return Ok(dir.to_path_buf());
        }
        if let Some(dir) = &self.dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .context("could not determine a data directory; pass --data-dir")
    }
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_owned()
}

/// `[defaults]` block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultsConfig {
    /// Column for tasks created without an explicit status.
    #[serde(default)]
    pub status: DefaultStatus,
    /// Priority for tasks created without an explicit priority.
    #[serde(default)]
    pub priority: Priority,
}

/// Wrapper so the default status deserializes from the same tokens the CLI accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultStatus(pub TaskStatus);

impl Default for DefaultStatus {
    fn default() -> Self {
        Self(TaskStatus::Todo)
    }
}

impl<'de> Deserialize<'de> for DefaultStatus {
    fn deserialize<D>(d: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(d)?;
        raw.parse().map(Self).map_err(serde::de::Error::custom)
    }
}
