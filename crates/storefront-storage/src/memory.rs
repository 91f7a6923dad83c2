use dashmap::DashMap;
use std::sync::Arc;
use storefront_types::ports::key_value_store::{KeyValueStore, StoreError};

/// Volatile key/value store. With a quota it behaves like the browser's
/// origin-scoped storage: usage is counted as key bytes plus value bytes,
/// and a write that would exceed the quota fails without changing state.
#[derive(Clone)]
pub struct InMemoryStore {
    map: Arc<DashMap<String, Vec<u8>>>,
    quota_bytes: Option<usize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            map: Arc::new(DashMap::new()),
            quota_bytes: None,
        }
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            map: Arc::new(DashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    pub fn used_bytes(&self) -> usize {
        self.map
            .iter()
            .map(|kv| kv.key().len() + kv.value().len())
            .sum()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.map.get(key).map(|v| v.clone()))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        if let Some(quota) = self.quota_bytes {
            let replaced = self
                .map
                .get(key)
                .map(|v| key.len() + v.len())
                .unwrap_or(0);
            let attempted = self.used_bytes() - replaced + key.len() + value.len();
            if attempted > quota {
                return Err(StoreError::QuotaExceeded { attempted, quota });
            }
        }
        self.map.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.map.remove(key);
        Ok(())
    }
}
