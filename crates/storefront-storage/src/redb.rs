use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Arc;
use storefront_types::ports::key_value_store::{KeyValueStore, StoreError};

/// Single key/value table; values are the serialized blobs the order store
/// hands us, never interpreted here.
const KV_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("kv");

/// Durable key/value store backed by a single-file redb database. Commits
/// are persistent once `set`/`remove` return.
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create the database at the given path. The table is created
    /// up front so reads on a fresh file don't have to special-case it.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let db = Database::create(path)?;
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(KV_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }
}

fn backend_err(e: impl std::fmt::Display) -> StoreError {
    StoreError::Backend(e.to_string())
}

impl KeyValueStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let read_txn = self.db.begin_read().map_err(backend_err)?;
        let table = read_txn.open_table(KV_TABLE).map_err(backend_err)?;
        let value = table.get(key).map_err(backend_err)?;
        Ok(value.map(|v| v.value().to_vec()))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let write_txn = self.db.begin_write().map_err(backend_err)?;
        {
            let mut table = write_txn.open_table(KV_TABLE).map_err(backend_err)?;
            table.insert(key, value).map_err(backend_err)?;
        }
        write_txn.commit().map_err(backend_err)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let write_txn = self.db.begin_write().map_err(backend_err)?;
        {
            let mut table = write_txn.open_table(KV_TABLE).map_err(backend_err)?;
            table.remove(key).map_err(backend_err)?;
        }
        write_txn.commit().map_err(backend_err)?;
        Ok(())
    }
}
