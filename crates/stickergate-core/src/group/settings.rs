//! Typed accessors over the per-chat keys in the durable store.
//!
//! Every value is stored as a plain string and parsed here, at the read
//! boundary. Unparseable persisted values fall back to the default with a
//! warning instead of failing the session. Store failures are logged and
//! degrade to absent/false so the engine keeps running against a flaky
//! store.

use stickergate_types::chat::{FailAction, UserId};

use std::time::Duration;

use crate::bot_api::BotApi;
use crate::i18n;
use crate::storage::KvStore;

use super::engine::Group;

/// Challenge timeout when the chat has no `timeout` key.
pub(super) const DEFAULT_TIMEOUT_SECS: i64 = 60;

impl<S: KvStore, B: BotApi> Group<S, B> {
    fn key(&self, suffix: &str) -> String {
        format!("chat:{}:{suffix}", self.chat)
    }

    pub(super) async fn get_key(&self, suffix: &str) -> Option<String> {
        let key = self.key(suffix);
        match self.store.get(&key).await {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(%err, key, "store get failed");
                None
            }
        }
    }

    pub(super) async fn set_key(&self, suffix: &str, value: &str, ttl: Option<Duration>) {
        let key = self.key(suffix);
        if let Err(err) = self.store.set(&key, value, ttl).await {
            tracing::warn!(%err, key, "store set failed");
        }
    }

    pub(super) async fn del_key(&self, suffix: &str) {
        let key = self.key(suffix);
        if let Err(err) = self.store.delete(&key).await {
            tracing::warn!(%err, key, "store delete failed");
        }
    }

    pub(super) async fn exists_key(&self, suffix: &str) -> bool {
        let key = self.key(suffix);
        match self.store.exists(&key).await {
            Ok(exists) => exists,
            Err(err) => {
                tracing::warn!(%err, key, "store exists failed");
                false
            }
        }
    }

    pub(super) async fn enabled(&self) -> bool {
        self.exists_key("enabled").await
    }

    pub(super) async fn verbose(&self) -> bool {
        self.exists_key("verbose").await
    }

    pub(super) async fn quiet(&self) -> bool {
        self.exists_key("quiet").await
    }

    pub(super) async fn debug(&self) -> bool {
        self.exists_key("debug").await
    }

    pub(super) async fn timeout_secs(&self) -> i64 {
        self.get_key("timeout")
            .await
            .and_then(|s| s.parse::<i64>().ok())
            .filter(|t| *t > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub(super) async fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs().await as u64)
    }

    pub(super) async fn lang(&self) -> String {
        self.get_key("lang")
            .await
            .unwrap_or_else(|| i18n::DEFAULT_LANG.to_string())
    }

    pub(super) async fn action(&self) -> FailAction {
        match self.get_key("action").await {
            None => FailAction::default(),
            Some(s) => s.parse().unwrap_or_else(|err: String| {
                tracing::warn!(%err, chat = %self.chat, "invalid persisted action, using default");
                FailAction::default()
            }),
        }
    }

    /// The template for `hook` (`onjoin`, `onpass`, `onfail`): the stored
    /// override, or the locale default.
    pub(super) async fn template(&self, hook: &str) -> String {
        match self.get_key(&format!("{hook}:template")).await {
            Some(template) => template,
            None => self.fmt(&format!("{hook}.default"), &[]).await,
        }
    }

    /// Look up a locale string in this chat's language.
    pub(super) async fn fmt(&self, key: &str, args: &[&str]) -> String {
        i18n::format(&self.lang().await, key, args)
    }

    pub(super) async fn is_pending(&self, user: UserId) -> bool {
        self.exists_key(&format!("user:{user}:pending")).await
    }

    pub(super) async fn set_pending(&self, user: UserId) {
        self.set_key(&format!("user:{user}:pending"), "true", None).await;
    }

    pub(super) async fn clear_pending(&self, user: UserId) {
        self.del_key(&format!("user:{user}:pending")).await;
    }

    pub(super) async fn invalidate_role(&self, user: UserId) {
        self.del_key(&format!("user:{user}:role")).await;
    }
}
