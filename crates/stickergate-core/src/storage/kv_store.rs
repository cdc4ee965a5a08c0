//! Key-value store trait.
//!
//! Defines the interface for the durable per-chat configuration store.
//! Implementations live in stickergate-infra.

use stickergate_types::error::StoreError;

use std::time::Duration;

/// Trait for durable key-value storage with optional expiry.
///
/// Keys are pre-namespaced by the caller (`chat:<id>:<field>` and
/// `chat:<id>:user:<uid>:<field>`). Values are plain strings; parsing into
/// typed settings happens at the read boundary in the engine.
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait KvStore: Send + Sync + 'static {
    /// Get a value by key. Returns None if the key does not exist or has
    /// expired.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Set a value (upsert). A `ttl` makes the entry expire after that
    /// duration; `None` persists until deleted.
    fn set(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Delete a key. No-op if the key does not exist.
    fn delete(&self, key: &str) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Whether a live (non-expired) entry exists for the key.
    fn exists(&self, key: &str)
    -> impl std::future::Future<Output = Result<bool, StoreError>> + Send;
}
