//! Offline data store and action queue

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::info;

/// Action recorded while offline, to be replayed on sync
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedAction {
    pub id: String,
    pub action: String,
    pub payload: Value,
    pub queued_at: DateTime<Utc>,
    pub retry_count: u32,
    pub max_retries: u32,
    /// Higher is more urgent
    pub priority: i32,
}

/// Retries allowed for a queued action unless overridden
pub const DEFAULT_MAX_RETRIES: u32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncResult {
    pub success: bool,
    pub synced: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Default)]
pub struct OfflineStore {
    data: HashMap<String, Value>,
    queue: Vec<QueuedAction>,
}

impl OfflineStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store_data(&mut self, key: impl Into<String>, value: Value) {
        self.data.insert(key.into(), value);
    }

    pub fn get_data(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn remove_data(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    pub fn clear_all_data(&mut self) {
        self.data.clear();
    }

    pub fn add_to_queue(&mut self, action: impl Into<String>, payload: Value) -> String {
        self.add_to_queue_with_priority(action, payload, 0)
    }

    pub fn add_to_queue_with_priority(
        &mut self,
        action: impl Into<String>,
        payload: Value,
        priority: i32,
    ) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.queue.push(QueuedAction {
            id: id.clone(),
            action: action.into(),
            payload,
            queued_at: Utc::now(),
            retry_count: 0,
            max_retries: DEFAULT_MAX_RETRIES,
            priority,
        });
        id
    }

    pub fn clear_queue(&mut self) {
        self.queue.clear();
    }

    pub fn queue(&self) -> &[QueuedAction] {
        &self.queue
    }

    /// Report a sync of the queued actions.
    ///
    /// Nothing is transmitted and the queue is left as is; the result is
    /// always a success with no errors.
    pub fn sync_data(&self) -> SyncResult {
        info!("Sync requested with {} queued actions", self.queue.len());
        SyncResult {
            success: true,
            synced: self.queue.len(),
            errors: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_data_roundtrip() {
        let mut store = OfflineStore::new();
        store.store_data("note:1", json!({"text": "draft"}));
        store.store_data("note:1", json!({"text": "final"}));
        assert_eq!(store.get_data("note:1"), Some(&json!({"text": "final"})));

        assert!(store.remove_data("note:1").is_some());
        assert!(store.get_data("note:1").is_none());

        store.store_data("a", json!(1));
        store.store_data("b", json!(2));
        store.clear_all_data();
        assert!(store.get_data("a").is_none());
    }

    #[test]
    fn test_queue() {
        let mut store = OfflineStore::new();
        let id = store.add_to_queue("create_note", json!({"title": "x"}));
        store.add_to_queue_with_priority("delete_note", json!({"id": 3}), 5);

        assert_eq!(store.queue().len(), 2);
        assert_eq!(store.queue()[0].id, id);
        assert_eq!(store.queue()[0].retry_count, 0);
        assert_eq!(store.queue()[0].max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(store.queue()[1].action, "delete_note");
        assert_eq!(store.queue()[1].priority, 5);

        store.clear_queue();
        assert!(store.queue().is_empty());
    }

    #[test]
    fn test_sync_always_succeeds() {
        let mut store = OfflineStore::new();
        let empty = store.sync_data();
        assert!(empty.success);
        assert!(empty.errors.is_empty());

        store.add_to_queue("update", json!(null));
        let result = store.sync_data();
        assert!(result.success);
        assert!(result.errors.is_empty());
        assert_eq!(store.queue().len(), 1);
    }
}
