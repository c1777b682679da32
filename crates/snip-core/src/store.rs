use crate::error::Result;
use crate::key::Key;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// A read-only view of a store.
///
/// Every method runs as its own transaction: the result reflects one
/// consistent state of the table, never a mix of two writes.
#[async_trait]
pub trait ReadStore: Send + Sync + 'static {
    /// Retrieves the URL stored under `key`.
    /// Returns `Ok(None)` if the key does not exist.
    async fn get(&self, key: &Key) -> Result<Option<String>>;

    /// Checks whether a key already exists in the store.
    async fn contains(&self, key: &Key) -> Result<bool>;

    /// Returns a snapshot of every entry, in ascending key order.
    async fn get_all(&self) -> Result<BTreeMap<Key, String>>;

    /// Returns every key whose URL is byte-equal to `url`, in ascending key order.
    ///
    /// This is a full scan of the table.
    async fn get_by_value(&self, url: &str) -> Result<Vec<Key>>;

    /// Returns the number of entries.
    async fn len(&self) -> Result<usize>;
}

#[async_trait]
pub trait Store: ReadStore {
    /// Inserts or overwrites the URL stored under `key`.
    async fn set(&self, key: &Key, url: String) -> Result<()>;

    /// Inserts `url` under `key` only if the key has no current mapping.
    /// Returns `true` if the insert happened.
    async fn insert_if_absent(&self, key: &Key, url: String) -> Result<bool>;

    /// Removes every entry.
    async fn clear(&self) -> Result<()>;

    /// Releases the table. Every later call, including another `close`,
    /// fails with [`StoreError::Closed`](crate::StoreError::Closed).
    async fn close(&self) -> Result<()>;
}
