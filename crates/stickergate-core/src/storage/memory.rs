//! In-memory `KvStore`.
//!
//! Backs engine tests and token-less dry runs. Expiry uses
//! `tokio::time::Instant`, so paused-clock tests observe TTLs
//! deterministically.

use dashmap::DashMap;
use stickergate_types::error::StoreError;
use tokio::time::Instant;

use std::time::Duration;

use super::kv_store::KvStore;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

/// Concurrent in-memory implementation of [`KvStore`].
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: DashMap<String, Entry>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn live(&self, key: &str) -> Option<String> {
        let expired = match self.entries.get(key) {
            Some(entry) => match entry.expires_at {
                Some(at) if Instant::now() >= at => true,
                _ => return Some(entry.value.clone()),
            },
            None => return None,
        };
        if expired {
            self.entries.remove(key);
        }
        None
    }
}

impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.live(key))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError> {
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: ttl.map(|t| Instant::now() + t),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.live(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_roundtrip() {
        let store = MemoryKvStore::new();
        store.set("chat:1:lang", "en_US", None).await.unwrap();
        assert_eq!(
            store.get("chat:1:lang").await.unwrap(),
            Some("en_US".to_string())
        );
        assert!(store.exists("chat:1:lang").await.unwrap());
    }

    #[tokio::test]
    async fn missing_key_reads_as_absent() {
        let store = MemoryKvStore::new();
        assert_eq!(store.get("chat:1:enabled").await.unwrap(), None);
        assert!(!store.exists("chat:1:enabled").await.unwrap());
    }

    #[tokio::test]
    async fn delete_removes_entry() {
        let store = MemoryKvStore::new();
        store.set("k", "v", None).await.unwrap();
        store.delete("k").await.unwrap();
        assert!(!store.exists("k").await.unwrap());
        // Deleting again is a no-op
        store.delete("k").await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn ttl_entry_expires() {
        let store = MemoryKvStore::new();
        store
            .set("chat:1:user:7:role", "admin", Some(Duration::from_secs(120)))
            .await
            .unwrap();
        assert!(store.exists("chat:1:user:7:role").await.unwrap());

        tokio::time::advance(Duration::from_secs(121)).await;
        assert_eq!(store.get("chat:1:user:7:role").await.unwrap(), None);
        assert!(!store.exists("chat:1:user:7:role").await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn overwrite_clears_previous_ttl() {
        let store = MemoryKvStore::new();
        store
            .set("k", "short", Some(Duration::from_secs(1)))
            .await
            .unwrap();
        store.set("k", "forever", None).await.unwrap();

        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(store.get("k").await.unwrap(), Some("forever".to_string()));
    }
}
