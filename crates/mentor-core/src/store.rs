//! Persistent store contract.
//!
//! Defines the interface every storage backend implements: named,
//! lazily-created collections of JSON entities addressed by id. The store
//! exclusively owns all entity state; actors hold nothing across messages.
//!
//! # Guarantees and limitations
//!
//! - Writes to the same id from the same caller are applied in issuance
//!   order.
//! - There is no cross-collection transactionality: a sequence of writes to
//!   two collections can be observed partially applied if the process
//!   terminates mid-sequence.
//! - Concurrent `put`s to the same id from two different requests resolve
//!   last-writer-wins.

use crate::error::{MentorError, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

/// Collection names used by the actor roles.
pub mod collections {
    pub const SESSIONS: &str = "sessions";
    pub const PROBLEMS: &str = "problems";
    pub const PROBLEM_USAGE: &str = "problem_usage";
    pub const EVALUATIONS: &str = "evaluations";
    pub const HINTS: &str = "hints";
    pub const STUDY_PLANS: &str = "study_plans";
    pub const SESSION_HISTORY: &str = "session_history";
}

/// An abstract, schema-less collection store.
///
/// Collections are created transparently on first access — reading from an
/// unknown collection yields an empty result, writing creates it.
#[async_trait]
pub trait Store: Send + Sync {
    /// Upserts `item` into `collection`, keyed by its `"id"` field.
    ///
    /// A missing or empty id is filled in with a generated UUID string.
    /// Returns the item as stored (id included).
    async fn put(&self, collection: &str, item: Value) -> Result<Value>;

    /// Finds an item by id. `Ok(None)` when absent.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>>;

    /// Returns every item in the collection (empty for unknown collections).
    async fn get_all(&self, collection: &str) -> Result<Vec<Value>>;

    /// Deletes an item by id. Deleting an absent id is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<()>;
}

/// Ensures `item` is a JSON object carrying a non-empty string id,
/// generating one when absent. Returns the effective id.
///
/// Shared by store backends so id assignment behaves identically everywhere.
pub fn ensure_item_id(item: &mut Value) -> Result<String> {
    let obj = item.as_object_mut().ok_or_else(|| {
        MentorError::validation("store items must be JSON objects")
    })?;

    match obj.get("id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => {
            let id = Uuid::new_v4().to_string();
            obj.insert("id".to_string(), Value::String(id.clone()));
            Ok(id)
        }
    }
}

/// Typed convenience layer over [`Store`].
///
/// Keeps the trait itself object-safe while letting callers round-trip any
/// serde entity without hand-writing conversions.
#[async_trait]
pub trait StoreExt: Store {
    /// Serializes and upserts an entity, returning it as stored.
    async fn put_entity<T>(&self, collection: &str, entity: &T) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        let value = serde_json::to_value(entity)?;
        let stored = self.put(collection, value).await?;
        Ok(serde_json::from_value(stored)?)
    }

    /// Finds and deserializes an entity by id.
    async fn get_entity<T>(&self, collection: &str, id: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        match self.get(collection, id).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Deserializes every entity in the collection.
    ///
    /// Items that fail to deserialize are skipped — a collection may carry
    /// older shapes alongside current ones.
    async fn entities<T>(&self, collection: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send,
    {
        let values = self.get_all(collection).await?;
        Ok(values
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect())
    }
}

#[async_trait]
impl<S: Store + ?Sized> StoreExt for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ensure_item_id_generates() {
        let mut item = json!({"name": "two-sum"});
        let id = ensure_item_id(&mut item).unwrap();
        assert!(!id.is_empty());
        assert_eq!(item["id"], Value::String(id));
    }

    #[test]
    fn test_ensure_item_id_keeps_existing() {
        let mut item = json!({"id": "p-1", "name": "two-sum"});
        let id = ensure_item_id(&mut item).unwrap();
        assert_eq!(id, "p-1");
    }

    #[test]
    fn test_ensure_item_id_rejects_non_object() {
        let mut item = json!(["not", "an", "object"]);
        assert!(ensure_item_id(&mut item).unwrap_err().is_validation());
    }
}
