use crate::error::StoreResult;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// String key-value persistence backing the slot store
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, `None` when absent
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    /// Insert or replace the value under `key`
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    /// Delete `key`, returns true if it existed
    fn remove(&self, key: &str) -> StoreResult<bool>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        (**self).remove(key)
    }
}

/// In-memory implementation of KeyValueStore; clones share the same data
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    data: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.data.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.data.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        Ok(self.data.write().remove(key).is_some())
    }
}
