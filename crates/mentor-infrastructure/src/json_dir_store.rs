//! JSON directory store backend.
//!
//! Durable counterpart of [`MemoryStore`](crate::MemoryStore): one directory
//! per collection, one pretty-printed JSON file per entity.
//!
//! Directory structure:
//! ```text
//! base_dir/
//! ├── sessions/
//! │   ├── <id>.json
//! │   └── ...
//! └── evaluations/
//!     └── <id>.json
//! ```
//!
//! Writes are atomic (temp file + fsync + rename) and serialized through an
//! exclusive per-store lock file, so partially-written entities are never
//! observable. There is still no cross-collection transactionality: a crash
//! between two puts leaves the first applied and the second not.

use async_trait::async_trait;
use mentor_core::error::{MentorError, Result};
use mentor_core::store::{Store, ensure_item_id};
use serde_json::Value;
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// A file-per-entity JSON store rooted at a base directory.
pub struct JsonDirStore {
    base_dir: PathBuf,
    /// Serializes writers within this process; the lock file covers other
    /// processes
    write_guard: Mutex<()>,
}

impl JsonDirStore {
    /// Opens (and creates, if needed) a store rooted at `base_dir`.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)
            .map_err(|e| MentorError::store(format!("create {}: {}", base_dir.display(), e)))?;
        Ok(Self {
            base_dir,
            write_guard: Mutex::new(()),
        })
    }

    /// The store's root directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn collection_dir(&self, collection: &str) -> Result<PathBuf> {
        // Collection names come from code, not users, but reject separators
        // anyway so a bad name cannot escape the base directory.
        if collection.is_empty() || collection.contains(['/', '\\', '.']) {
            return Err(MentorError::validation(format!(
                "invalid collection name: {:?}",
                collection
            )));
        }
        Ok(self.base_dir.join(collection))
    }

    fn entity_path(&self, collection: &str, id: &str) -> Result<PathBuf> {
        if id.is_empty() || id.contains(['/', '\\']) || id == "." || id == ".." {
            return Err(MentorError::validation(format!("invalid entity id: {:?}", id)));
        }
        Ok(self.collection_dir(collection)?.join(format!("{}.json", id)))
    }

    /// Writes `item` atomically: temp file in the same directory, fsync,
    /// then rename over the target.
    fn write_atomic(path: &Path, item: &Value) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| MentorError::store("entity path has no parent directory"))?;
        fs::create_dir_all(parent)
            .map_err(|e| MentorError::store(format!("create {}: {}", parent.display(), e)))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let tmp_path = parent.join(format!(".{}.tmp", file_name));

        let text = serde_json::to_string_pretty(item)
            .map_err(|e| MentorError::store(format!("serialize entity: {}", e)))?;

        let mut tmp = File::create(&tmp_path)
            .map_err(|e| MentorError::store(format!("create {}: {}", tmp_path.display(), e)))?;
        tmp.write_all(text.as_bytes())
            .and_then(|_| tmp.sync_all())
            .map_err(|e| MentorError::store(format!("write {}: {}", tmp_path.display(), e)))?;
        drop(tmp);

        fs::rename(&tmp_path, path)
            .map_err(|e| MentorError::store(format!("rename into {}: {}", path.display(), e)))
    }

    /// Acquires the cross-process lock file for this store.
    fn acquire_file_lock(&self) -> Result<FileLock> {
        FileLock::acquire(&self.base_dir.join(".mentor.lock"))
    }
}

#[async_trait]
impl Store for JsonDirStore {
    async fn put(&self, collection: &str, mut item: Value) -> Result<Value> {
        let id = ensure_item_id(&mut item)?;
        let path = self.entity_path(collection, &id)?;

        let _guard = self.write_guard.lock().await;
        let _lock = self.acquire_file_lock()?;
        Self::write_atomic(&path, &item)?;
        debug!(collection, id = %id, "entity written");
        Ok(item)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        let path = self.entity_path(collection, id)?;
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path)
            .map_err(|e| MentorError::store(format!("read {}: {}", path.display(), e)))?;
        let item = serde_json::from_str(&text)
            .map_err(|e| MentorError::store(format!("parse {}: {}", path.display(), e)))?;
        Ok(Some(item))
    }

    async fn get_all(&self, collection: &str) -> Result<Vec<Value>> {
        let dir = self.collection_dir(collection)?;
        if !dir.exists() {
            // Lazily-created collection that has never been written
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&dir)
            .map_err(|e| MentorError::store(format!("read {}: {}", dir.display(), e)))?;

        let mut items = Vec::new();
        for entry in entries {
            let entry =
                entry.map_err(|e| MentorError::store(format!("read {}: {}", dir.display(), e)))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match fs::read_to_string(&path).map_err(|e| e.to_string()).and_then(|text| {
                serde_json::from_str::<Value>(&text).map_err(|e| e.to_string())
            }) {
                Ok(item) => items.push(item),
                Err(e) => {
                    // One corrupt file should not hide the rest of the
                    // collection.
                    warn!(path = %path.display(), error = %e, "skipping unreadable entity");
                }
            }
        }
        Ok(items)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let path = self.entity_path(collection, id)?;
        let _guard = self.write_guard.lock().await;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MentorError::store(format!(
                "delete {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

/// A lock-file guard released on drop.
struct FileLock {
    #[allow(dead_code)]
    file: File,
}

impl FileLock {
    fn acquire(lock_path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path)
            .map_err(|e| MentorError::store(format!("open {}: {}", lock_path.display(), e)))?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| MentorError::store(format!("lock {}: {}", lock_path.display(), e)))?;
        }

        Ok(FileLock { file })
    }
}
