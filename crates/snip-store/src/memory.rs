use async_trait::async_trait;
use parking_lot::RwLock;
use snip_core::error::{Result, StoreError};
use snip_core::{Key, ReadStore, Store};
use std::collections::BTreeMap;
use tracing::{debug, info, trace};

type Table = BTreeMap<Key, String>;

/// In-memory implementation of the Store trait.
///
/// The whole table sits behind one `RwLock`, and every trait method takes
/// the lock exactly once: reads share it, writes hold it exclusively. That
/// makes each call a serializable transaction and keeps `get_all` a
/// consistent snapshot, which a sharded map cannot offer.
///
/// Nothing is persisted. Closing the store drops the table.
#[derive(Debug)]
pub struct MemoryStore {
    /// `None` once the store has been closed.
    table: RwLock<Option<Table>>,
    capacity: Option<usize>,
}

impl MemoryStore {
    /// Creates a new, unbounded in-memory store.
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Some(Table::new())),
            capacity: None,
        }
    }

    /// Creates a store that holds at most `capacity` entries.
    ///
    /// Inserting a new key into a full store fails with
    /// [`StoreError::CapacityExceeded`]; overwriting an existing key does not.
    pub fn with_capacity_limit(capacity: usize) -> Self {
        Self {
            table: RwLock::new(Some(Table::new())),
            capacity: Some(capacity),
        }
    }

    /// Returns the configured entry limit, if any.
    pub fn capacity_limit(&self) -> Option<usize> {
        self.capacity
    }

    /// Runs `f` inside a read transaction.
    fn view<T>(&self, f: impl FnOnce(&Table) -> T) -> Result<T> {
        let guard = self.table.read();
        let table = guard.as_ref().ok_or(StoreError::Closed)?;
        Ok(f(table))
    }

    /// Runs `f` inside a write transaction.
    ///
    /// `f` must fail before it mutates the table: there is no rollback.
    fn update<T>(&self, f: impl FnOnce(&mut Table) -> Result<T>) -> Result<T> {
        let mut guard = self.table.write();
        let table = guard.as_mut().ok_or(StoreError::Closed)?;
        f(table)
    }

    fn ensure_room(&self, table: &Table, key: &Key) -> Result<()> {
        match self.capacity {
            Some(capacity) if table.len() >= capacity && !table.contains_key(key) => {
                Err(StoreError::CapacityExceeded { capacity })
            }
            _ => Ok(()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReadStore for MemoryStore {
    async fn get(&self, key: &Key) -> Result<Option<String>> {
        trace!(key = %key, "looking up key");
        self.view(|table| table.get(key).cloned())
    }

    async fn contains(&self, key: &Key) -> Result<bool> {
        self.view(|table| table.contains_key(key))
    }

    async fn get_all(&self) -> Result<BTreeMap<Key, String>> {
        self.view(Table::clone)
    }

    async fn get_by_value(&self, url: &str) -> Result<Vec<Key>> {
        trace!(url, "scanning table by value");
        self.view(|table| {
            table
                .iter()
                .filter(|(_, value)| value.as_str() == url)
                .map(|(key, _)| key.clone())
                .collect()
        })
    }

    async fn len(&self) -> Result<usize> {
        self.view(Table::len)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn set(&self, key: &Key, url: String) -> Result<()> {
        self.update(|table| {
            self.ensure_room(table, key)?;
            table.insert(key.clone(), url);
            Ok(())
        })?;
        trace!(key = %key, "stored entry");
        Ok(())
    }

    async fn insert_if_absent(&self, key: &Key, url: String) -> Result<bool> {
        let inserted = self.update(|table| {
            if table.contains_key(key) {
                return Ok(false);
            }
            self.ensure_room(table, key)?;
            table.insert(key.clone(), url);
            Ok(true)
        })?;
        trace!(key = %key, inserted, "insert if absent");
        Ok(inserted)
    }

    async fn clear(&self) -> Result<()> {
        let removed = self.update(|table| {
            let removed = table.len();
            table.clear();
            Ok(removed)
        })?;
        debug!(removed, "cleared store");
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        let table = self.table.write().take().ok_or(StoreError::Closed)?;
        info!(entries = table.len(), "closed store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> Key {
        Key::new_unchecked(s)
    }

    #[tokio::test]
    async fn set_and_get() {
        let store = MemoryStore::new();

        store
            .set(&key("abc123"), "https://example.com".to_string())
            .await
            .unwrap();

        let url = store.get(&key("abc123")).await.unwrap();
        assert_eq!(url.as_deref(), Some("https://example.com"));
    }

    #[tokio::test]
    async fn stores_url_verbatim() {
        let store = MemoryStore::new();
        let raw = "https://example.com/a%20b?q=ü&x=1#frag ment";

        store.set(&key("raw"), raw.to_string()).await.unwrap();

        assert_eq!(store.get(&key("raw")).await.unwrap().unwrap(), raw);
    }

    #[tokio::test]
    async fn get_nonexistent() {
        let store = MemoryStore::new();
        store
            .set(&key("abc"), "https://example.com".to_string())
            .await
            .unwrap();

        assert!(store.get(&key("nope")).await.unwrap().is_none());
        assert!(store.get(&key("ab")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_overwrites() {
        let store = MemoryStore::new();

        store
            .set(&key("abc"), "https://old.com".to_string())
            .await
            .unwrap();
        store
            .set(&key("abc"), "https://new.com".to_string())
            .await
            .unwrap();

        assert_eq!(store.len().await.unwrap(), 1);
        assert_eq!(
            store.get(&key("abc")).await.unwrap().as_deref(),
            Some("https://new.com")
        );
    }

    #[tokio::test]
    async fn insert_if_absent_keeps_existing() {
        let store = MemoryStore::new();

        assert!(store
            .insert_if_absent(&key("abc"), "https://first.com".to_string())
            .await
            .unwrap());
        assert!(!store
            .insert_if_absent(&key("abc"), "https://second.com".to_string())
            .await
            .unwrap());

        assert_eq!(
            store.get(&key("abc")).await.unwrap().as_deref(),
            Some("https://first.com")
        );
    }

    #[tokio::test]
    async fn contains_checks() {
        let store = MemoryStore::new();

        assert!(!store.contains(&key("abc")).await.unwrap());
        store
            .set(&key("abc"), "https://example.com".to_string())
            .await
            .unwrap();
        assert!(store.contains(&key("abc")).await.unwrap());
    }

    #[tokio::test]
    async fn get_all_is_ordered_by_key() {
        let store = MemoryStore::new();
        for (k, url) in [
            ("zeta", "https://z.com"),
            ("Alpha", "https://a.com"),
            ("mid", "https://m.com"),
        ] {
            store.set(&key(k), url.to_string()).await.unwrap();
        }

        let all = store.get_all().await.unwrap();
        let keys: Vec<&str> = all.keys().map(Key::as_str).collect();
        assert_eq!(keys, ["Alpha", "mid", "zeta"]);
        assert_eq!(all[&key("mid")], "https://m.com");
    }

    #[tokio::test]
    async fn get_by_value_returns_every_match() {
        let store = MemoryStore::new();
        store
            .set(&key("k2"), "https://x.com".to_string())
            .await
            .unwrap();
        store
            .set(&key("k1"), "https://x.com".to_string())
            .await
            .unwrap();
        store
            .set(&key("k3"), "https://x.com/".to_string())
            .await
            .unwrap();

        let keys = store.get_by_value("https://x.com").await.unwrap();
        assert_eq!(keys, vec![key("k1"), key("k2")]);

        assert!(store.get_by_value("https://y.com").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let store = MemoryStore::new();
        for i in 0..5 {
            store
                .set(&key(&format!("k{i}")), format!("https://example{i}.com"))
                .await
                .unwrap();
        }
        assert_eq!(store.len().await.unwrap(), 5);

        store.clear().await.unwrap();
        assert_eq!(store.len().await.unwrap(), 0);

        store.clear().await.unwrap();
        assert_eq!(store.len().await.unwrap(), 0);
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn capacity_limit_rejects_new_keys() {
        let store = MemoryStore::with_capacity_limit(2);
        store.set(&key("a"), "https://a.com".to_string()).await.unwrap();
        store.set(&key("b"), "https://b.com".to_string()).await.unwrap();

        let err = store
            .set(&key("c"), "https://c.com".to_string())
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::CapacityExceeded { capacity: 2 });

        let err = store
            .insert_if_absent(&key("c"), "https://c.com".to_string())
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::CapacityExceeded { capacity: 2 });

        // Overwrites do not grow the table.
        store.set(&key("a"), "https://a2.com".to_string()).await.unwrap();

        assert_eq!(store.len().await.unwrap(), 2);
        assert!(store.get(&key("c")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clear_frees_capacity() {
        let store = MemoryStore::with_capacity_limit(1);
        store.set(&key("a"), "https://a.com".to_string()).await.unwrap();
        store.clear().await.unwrap();

        store.set(&key("b"), "https://b.com".to_string()).await.unwrap();
        assert_eq!(store.capacity_limit(), Some(1));
    }

    #[tokio::test]
    async fn closed_store_rejects_operations() {
        let store = MemoryStore::new();
        store.set(&key("a"), "https://a.com".to_string()).await.unwrap();

        store.close().await.unwrap();

        assert_eq!(store.get(&key("a")).await.unwrap_err(), StoreError::Closed);
        assert_eq!(store.len().await.unwrap_err(), StoreError::Closed);
        assert_eq!(store.clear().await.unwrap_err(), StoreError::Closed);
        assert_eq!(
            store
                .set(&key("b"), "https://b.com".to_string())
                .await
                .unwrap_err(),
            StoreError::Closed
        );
        assert_eq!(store.close().await.unwrap_err(), StoreError::Closed);
    }

    #[tokio::test]
    async fn concurrent_access() {
        use std::sync::Arc;

        let store = Arc::new(MemoryStore::new());
        let mut handles = vec![];

        for i in 0..10u64 {
            let store = Arc::clone(&store);
            let handle = tokio::spawn(async move {
                let k = Key::new_unchecked(format!("key-{:03}", i));
                store
                    .set(&k, format!("https://example{}.com", i))
                    .await
                    .unwrap();
            });
            handles.push(handle);
        }

        for i in 0..10u64 {
            let store = Arc::clone(&store);
            let handle = tokio::spawn(async move {
                let k = Key::new_unchecked(format!("key-{:03}", i));
                let _ = store.get(&k).await;
                let _ = store.get_all().await;
            });
            handles.push(handle);
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.len().await.unwrap(), 10);
        for i in 0..10u64 {
            let k = Key::new_unchecked(format!("key-{:03}", i));
            let url = store.get(&k).await.unwrap().unwrap();
            assert_eq!(url, format!("https://example{}.com", i));
        }
    }

    #[tokio::test]
    async fn concurrent_insert_if_absent_has_one_winner() {
        use std::sync::Arc;

        let store = Arc::new(MemoryStore::new());
        let mut handles = vec![];

        for i in 0..16u64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .insert_if_absent(&Key::new_unchecked("same"), format!("https://{i}.com"))
                    .await
                    .unwrap()
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
        assert_eq!(store.len().await.unwrap(), 1);
    }
}
