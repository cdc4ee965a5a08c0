//! SQLite key-value store implementation.
//!
//! Implements `KvStore` from `stickergate-core` using sqlx with split
//! read/write pools. One row per key with an optional RFC 3339
//! `expires_at`; reads treat an expired row as absent and delete it
//! lazily, so no sweeper task is needed.

use chrono::{DateTime, Utc};
use sqlx::Row;
use stickergate_core::storage::KvStore;
use stickergate_types::error::StoreError;

use std::time::Duration;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `KvStore`.
pub struct SqliteKvStore {
    pool: DatabasePool,
}

impl SqliteKvStore {
    /// Create a new KV store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn live_value(&self, key: &str) -> Result<Option<String>, StoreError> {
        let row = sqlx::query("SELECT value, expires_at FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let Some(row) = row else { return Ok(None) };
        let value: String = row
            .try_get("value")
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let expires_at: Option<String> = row
            .try_get("expires_at")
            .map_err(|e| StoreError::Query(e.to_string()))?;

        if let Some(expires_at) = expires_at {
            let expires_at = parse_datetime(&expires_at)?;
            if expires_at <= Utc::now() {
                sqlx::query("DELETE FROM kv_store WHERE key = ?")
                    .bind(key)
                    .execute(&self.pool.writer)
                    .await
                    .map_err(|e| StoreError::Query(e.to_string()))?;
                return Ok(None);
            }
        }

        Ok(Some(value))
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Query(format!("invalid datetime: {e}")))
}

impl KvStore for SqliteKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.live_value(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError> {
        let now = Utc::now();
        let expires_at = match ttl {
            Some(ttl) => {
                let ttl = chrono::Duration::from_std(ttl)
                    .map_err(|e| StoreError::Query(format!("ttl out of range: {e}")))?;
                Some((now + ttl).to_rfc3339())
            }
            None => None,
        };

        sqlx::query(
            r#"INSERT INTO kv_store (key, value, expires_at, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT (key) DO UPDATE SET value = excluded.value, expires_at = excluded.expires_at, updated_at = excluded.updated_at"#,
        )
        .bind(key)
        .bind(value)
        .bind(&expires_at)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.live_value(key).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> SqliteKvStore {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        std::mem::forget(dir);
        SqliteKvStore::new(DatabasePool::new(&url).await.unwrap())
    }

    #[tokio::test]
    async fn test_set_get_roundtrip() {
        let store = test_store().await;

        store.set("chat:-1:lang", "zh_CN", None).await.unwrap();

        let got = store.get("chat:-1:lang").await.unwrap();
        assert_eq!(got, Some("zh_CN".to_string()));
        assert!(store.exists("chat:-1:lang").await.unwrap());
    }

    #[tokio::test]
    async fn test_get_nonexistent_returns_none() {
        let store = test_store().await;

        assert_eq!(store.get("chat:-1:enabled").await.unwrap(), None);
        assert!(!store.exists("chat:-1:enabled").await.unwrap());
    }

    #[tokio::test]
    async fn test_set_upserts() {
        let store = test_store().await;

        store.set("chat:-1:timeout", "30", None).await.unwrap();
        store.set("chat:-1:timeout", "90", None).await.unwrap();

        assert_eq!(
            store.get("chat:-1:timeout").await.unwrap(),
            Some("90".to_string())
        );
    }

    #[tokio::test]
    async fn test_delete() {
        let store = test_store().await;

        store.set("chat:-1:user:7:pending", "true", None).await.unwrap();
        store.delete("chat:-1:user:7:pending").await.unwrap();

        assert_eq!(store.get("chat:-1:user:7:pending").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_nonexistent_is_noop() {
        let store = test_store().await;

        // Should not error
        store.delete("chat:-1:nope").await.unwrap();
    }

    #[tokio::test]
    async fn test_future_ttl_entry_is_live() {
        let store = test_store().await;

        store
            .set("chat:-1:user:7:role", "admin", Some(Duration::from_secs(120)))
            .await
            .unwrap();

        assert_eq!(
            store.get("chat:-1:user:7:role").await.unwrap(),
            Some("admin".to_string())
        );
    }

    #[tokio::test]
    async fn test_expired_entry_reads_as_absent_and_is_deleted() {
        let store = test_store().await;
        store
            .set("chat:-1:user:7:role", "admin", Some(Duration::from_secs(120)))
            .await
            .unwrap();

        // Backdate the expiry instead of sleeping through the TTL
        let past = (Utc::now() - chrono::Duration::seconds(1)).to_rfc3339();
        sqlx::query("UPDATE kv_store SET expires_at = ? WHERE key = ?")
            .bind(&past)
            .bind("chat:-1:user:7:role")
            .execute(&store.pool.writer)
            .await
            .unwrap();

        assert_eq!(store.get("chat:-1:user:7:role").await.unwrap(), None);
        assert!(!store.exists("chat:-1:user:7:role").await.unwrap());

        let rows: Vec<(String,)> = sqlx::query_as("SELECT key FROM kv_store")
            .fetch_all(&store.pool.reader)
            .await
            .unwrap();
        assert!(rows.is_empty(), "expired row should be deleted lazily");
    }

    #[tokio::test]
    async fn test_overwrite_clears_previous_ttl() {
        let store = test_store().await;
        store
            .set("chat:-1:enabled", "true", Some(Duration::from_secs(60)))
            .await
            .unwrap();
        store.set("chat:-1:enabled", "true", None).await.unwrap();

        let expires: (Option<String>,) =
            sqlx::query_as("SELECT expires_at FROM kv_store WHERE key = ?")
                .bind("chat:-1:enabled")
                .fetch_one(&store.pool.reader)
                .await
                .unwrap();
        assert_eq!(expires.0, None);
    }
}
