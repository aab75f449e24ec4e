//! In-memory store backend.
//!
//! The default backend: a map of collections, each a map of id to JSON
//! entity. Collections appear transparently on first use and all state is
//! lost when the process exits.

use async_trait::async_trait;
use mentor_core::error::Result;
use mentor_core::store::{Store, ensure_item_id};
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A process-local, schema-less collection store.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, HashMap<String, Value>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items currently held by a collection (0 when it does not
    /// exist yet).
    pub async fn len(&self, collection: &str) -> usize {
        let collections = self.collections.read().await;
        collections.get(collection).map_or(0, HashMap::len)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn put(&self, collection: &str, mut item: Value) -> Result<Value> {
        let id = ensure_item_id(&mut item)?;
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id, item.clone());
        Ok(item)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|items| items.get(id))
            .cloned())
    }

    async fn get_all(&self, collection: &str) -> Result<Vec<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|items| items.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        if let Some(items) = collections.get_mut(collection) {
            items.remove(id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mentor_core::store::StoreExt;
    use serde_json::json;

    #[tokio::test]
    async fn test_put_get_round_trip() {
        let store = MemoryStore::new();
        let stored = store
            .put("sessions", json!({"id": "s1", "active": true}))
            .await
            .unwrap();

        let loaded = store.get("sessions", "s1").await.unwrap();
        assert_eq!(loaded, Some(stored));
    }

    #[tokio::test]
    async fn test_put_generates_missing_id() {
        let store = MemoryStore::new();
        let stored = store.put("problems", json!({"title": "Two Sum"})).await.unwrap();
        let id = stored["id"].as_str().unwrap().to_string();
        assert!(!id.is_empty());
        assert!(store.get("problems", &id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_put_upserts_by_id() {
        let store = MemoryStore::new();
        store.put("sessions", json!({"id": "s1", "n": 1})).await.unwrap();
        store.put("sessions", json!({"id": "s1", "n": 2})).await.unwrap();

        assert_eq!(store.len("sessions").await, 1);
        let loaded = store.get("sessions", "s1").await.unwrap().unwrap();
        assert_eq!(loaded["n"], 2);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_none() {
        let store = MemoryStore::new();
        store.put("hints", json!({"id": "h1"})).await.unwrap();
        store.delete("hints", "h1").await.unwrap();
        assert_eq!(store.get("hints", "h1").await.unwrap(), None);

        // deleting twice is fine
        store.delete("hints", "h1").await.unwrap();
    }

    #[tokio::test]
    async fn test_unknown_collection_reads_empty() {
        let store = MemoryStore::new();
        assert!(store.get_all("never_written").await.unwrap().is_empty());
        assert_eq!(store.get("never_written", "x").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_typed_extension_round_trip() {
        #[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug)]
        struct Thing {
            id: String,
            label: String,
        }

        let store = MemoryStore::new();
        let thing = Thing {
            id: "t1".to_string(),
            label: "widget".to_string(),
        };
        store.put_entity("things", &thing).await.unwrap();

        let loaded: Option<Thing> = store.get_entity("things", "t1").await.unwrap();
        assert_eq!(loaded, Some(thing));
    }
}
