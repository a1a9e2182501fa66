//! Configuration loading and management
//!
//! Handles parsing of `config.toml` from the user's config directory.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;
use crate::storage::{validate_slot_name, DEFAULT_SLOT};

const CONFIG_FILE: &str = "config.toml";
const MIN_POLL_MS: u64 = 10;
const MAX_POLL_MS: u64 = 1000;
const MAX_LOCK_TIMEOUT_MS: u64 = 60_000;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Where the task list is persisted
    #[serde(default)]
    pub storage: StorageConfig,

    /// Terminal UI behavior
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Data directory; the platform data dir when unset
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Slot name the list is stored under
    #[serde(default = "default_slot")]
    pub slot: String,

    /// How long to wait for another tick process holding the list
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_slot() -> String {
    DEFAULT_SLOT.to_string()
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            slot: default_slot(),
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UiConfig {
    /// Capture mouse events (clicks and drag-and-drop)
    #[serde(default = "default_true")]
    pub mouse: bool,

    /// Input poll interval in milliseconds
    #[serde(default = "default_poll_ms")]
    pub poll_ms: u64,
}

fn default_true() -> bool {
    true
}

fn default_poll_ms() -> u64 {
    crate::ui::task_list::app::DEFAULT_POLL_MS
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            mouse: default_true(),
            poll_ms: default_poll_ms(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "tick")
}

impl Config {
    /// Load and validate configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, using defaults when the file does not exist
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::default_path) else {
            return Ok(Self::default());
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        tracing::debug!(path = %path.display(), "loading config");
        Self::load(&path)
    }

    /// `<config dir>/tick/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Resolve the data directory: `override_dir`, then `storage.dir`, then
    /// the platform data dir.
    pub fn data_dir(&self, override_dir: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = override_dir {
            return Ok(dir.to_path_buf());
        }
        if let Some(dir) = self.storage.dir.as_ref() {
            return Ok(dir.clone());
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(Error::DataDirUnavailable)
    }

    fn validate(&self) -> Result<()> {
        if validate_slot_name(&self.storage.slot).is_err() {
            return Err(Error::InvalidConfig(format!(
                "storage.slot '{}' must be non-empty and use only [A-Za-z0-9_-]",
                self.storage.slot
            )));
        }
        if self.storage.lock_timeout_ms > MAX_LOCK_TIMEOUT_MS {
            return Err(Error::InvalidConfig(format!(
                "storage.lock_timeout_ms must be at most {MAX_LOCK_TIMEOUT_MS}, got {}",
                self.storage.lock_timeout_ms
            )));
        }
        if !(MIN_POLL_MS..=MAX_POLL_MS).contains(&self.ui.poll_ms) {
            return Err(Error::InvalidConfig(format!(
                "ui.poll_ms must be between {MIN_POLL_MS} and {MAX_POLL_MS}, got {}",
                self.ui.poll_ms
            )));
        }
        Ok(())
    }
}
