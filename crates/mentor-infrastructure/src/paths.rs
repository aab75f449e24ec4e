//! Unified path management for mentor configuration and data files.
//!
//! This ensures consistency across all platforms (Linux, macOS, Windows).

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for mentor.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/mentor/            # Config directory
/// └── config.toml              # Application configuration
///
/// ~/.local/share/mentor/       # Data directory
/// └── store/                   # JSON directory store collections
/// ```
pub struct MentorPaths;

impl MentorPaths {
    /// Returns the mentor configuration directory.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("mentor"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the mentor data directory (for the durable store).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join("mentor"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the default root of the JSON directory store.
    pub fn store_dir() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("store"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir() {
        let config_dir = MentorPaths::config_dir().unwrap();
        assert!(config_dir.ends_with("mentor"));
    }

    #[test]
    fn test_config_file() {
        let config_file = MentorPaths::config_file().unwrap();
        assert!(config_file.ends_with("config.toml"));
        let config_dir = MentorPaths::config_dir().unwrap();
        assert!(config_file.starts_with(&config_dir));
    }

    #[test]
    fn test_store_dir() {
        let store_dir = MentorPaths::store_dir().unwrap();
        assert!(store_dir.ends_with("store"));
        let data_dir = MentorPaths::data_dir().unwrap();
        assert!(store_dir.starts_with(&data_dir));
    }
}
