#[cfg(not(any(feature = "memory", feature = "redb")))]
compile_error!("Enable a storage feature: `memory` or `redb`.");

use storefront_types::ports::key_value_store::{KeyValueStore, StoreError};

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "redb")]
pub mod redb;

pub struct Storage {
    #[cfg(feature = "memory")]
    memory: memory::InMemoryStore,
    #[cfg(feature = "redb")]
    redb: redb::RedbStore,
}

pub fn build_storage(path: Option<&str>) -> anyhow::Result<Storage> {
    Storage::build_storage(path)
}

impl Storage {
    #[cfg(all(feature = "memory", not(feature = "redb")))]
    pub fn build_storage(_: Option<&str>) -> anyhow::Result<Self> {
        Ok(Self {
            memory: memory::InMemoryStore::new(),
        })
    }

    #[cfg(all(feature = "redb", not(feature = "memory")))]
    pub fn build_storage(path: Option<&str>) -> anyhow::Result<Self> {
        let path = path.unwrap_or("storefront.redb");
        Ok(Self {
            redb: redb::RedbStore::open(path)?,
        })
    }

    // If both features are enabled
    #[cfg(all(feature = "redb", feature = "memory"))]
    pub fn build_storage(path: Option<&str>) -> anyhow::Result<Self> {
        let memory = memory::InMemoryStore::new();
        let path = path.unwrap_or("storefront.redb");
        let redb = redb::RedbStore::open(path)?;
        Ok(Self { memory, redb })
    }
}

#[cfg(all(feature = "memory", not(feature = "redb")))]
impl KeyValueStore for Storage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.memory.get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.memory.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.memory.remove(key)
    }
}

#[cfg(all(feature = "redb", not(feature = "memory")))]
impl KeyValueStore for Storage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.redb.get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.redb.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.redb.remove(key)
    }
}

#[cfg(all(feature = "redb", feature = "memory"))]
impl KeyValueStore for Storage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.redb.get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.redb.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.redb.remove(key)
    }
}
