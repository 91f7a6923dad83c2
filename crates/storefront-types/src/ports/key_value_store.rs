use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Backend(String),
    #[error("quota exceeded: write of {attempted} bytes over {quota}-byte limit")]
    QuotaExceeded { attempted: usize, quota: usize },
}

/// The persistence medium: a synchronous, origin-scoped key/value byte store
/// with an implementation-defined capacity. The order store serializes its
/// whole collection under one key and the cart-id cache under another; this
/// trait never sees domain types.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}
