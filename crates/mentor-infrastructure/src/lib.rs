//! Store backends and platform plumbing for MENTOR.

pub mod json_dir_store;
pub mod memory_store;
pub mod paths;

pub use crate::json_dir_store::JsonDirStore;
pub use crate::memory_store::MemoryStore;
pub use crate::paths::{MentorPaths, PathError};

use mentor_core::config::{StorageBackend, StorageConfig};
use mentor_core::error::{MentorError, Result};
use mentor_core::store::Store;
use std::sync::Arc;

/// Builds the store backend selected by the configuration.
pub fn store_from_config(config: &StorageConfig) -> Result<Arc<dyn Store>> {
    match config.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StorageBackend::JsonDir => {
            let base_dir = match &config.data_dir {
                Some(dir) => dir.clone(),
                None => MentorPaths::store_dir()
                    .map_err(|e| MentorError::config(e.to_string()))?,
            };
            Ok(Arc::new(JsonDirStore::new(base_dir)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend_by_default() {
        let store = store_from_config(&StorageConfig::default());
        assert!(store.is_ok());
    }

    #[test]
    fn test_json_dir_backend_with_explicit_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            backend: StorageBackend::JsonDir,
            data_dir: Some(dir.path().to_path_buf()),
        };
        assert!(store_from_config(&config).is_ok());
    }
}
