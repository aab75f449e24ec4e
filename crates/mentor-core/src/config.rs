//! Application configuration.
//!
//! Loaded from a TOML file; every field has a default so an empty file (or
//! no file at all) yields a working configuration.

use crate::error::{MentorError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration for the Mentor runtime.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct MentorConfig {
    pub dispatcher: DispatcherConfig,
    pub storage: StorageConfig,
}

/// Dispatcher tuning knobs.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DispatcherConfig {
    /// How long a caller waits for an actor reply before the pending
    /// request is rejected with a timeout
    pub request_timeout_secs: u64,
    /// Bounded mailbox size per actor
    pub mailbox_capacity: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            mailbox_capacity: 32,
        }
    }
}

impl DispatcherConfig {
    /// The request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Which store backend to run on.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StorageBackend {
    /// In-process map store, state lost on exit
    #[default]
    Memory,
    /// One JSON file per entity under a data directory
    JsonDir,
}

/// Store backend selection and location.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Data directory for the json-dir backend; platform default when unset
    pub data_dir: Option<PathBuf>,
}

impl MentorConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| MentorError::config(e.to_string()))
    }

    /// Loads a configuration file, falling back to defaults when the file
    /// does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| MentorError::config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }
}
