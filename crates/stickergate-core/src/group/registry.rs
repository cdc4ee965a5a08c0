//! Process-wide registry of chat engines.
//!
//! One [`Group`] per chat id, created lazily on first lookup and never
//! evicted: resolvers live inside the engine, so every update for a chat
//! must reach the same instance. Growth is unbounded by design -- one
//! entry per chat the bot has ever seen in this process.

use dashmap::DashMap;
use stickergate_types::chat::ChatId;

use std::sync::Arc;

use crate::bot_api::BotApi;
use crate::storage::KvStore;

use super::engine::Group;

/// Map from chat id to its single engine instance.
pub struct GroupRegistry<S, B> {
    store: Arc<S>,
    api: Arc<B>,
    groups: DashMap<ChatId, Arc<Group<S, B>>>,
}

impl<S: KvStore, B: BotApi> GroupRegistry<S, B> {
    pub fn new(store: Arc<S>, api: Arc<B>) -> Self {
        Self {
            store,
            api,
            groups: DashMap::new(),
        }
    }

    /// The engine for `chat`, constructing it on first use.
    pub fn get(&self, chat: ChatId) -> Arc<Group<S, B>> {
        if let Some(group) = self.groups.get(&chat) {
            return Arc::clone(&group);
        }
        let group = self
            .groups
            .entry(chat)
            .or_insert_with(|| {
                tracing::debug!(%chat, "creating engine");
                Arc::new(Group::new(chat, Arc::clone(&self.store), Arc::clone(&self.api)))
            });
        Arc::clone(&group)
    }

    /// Number of chats with a live engine.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKvStore;
    use crate::testing::FakeApi;

    fn registry() -> GroupRegistry<MemoryKvStore, FakeApi> {
        GroupRegistry::new(Arc::new(MemoryKvStore::new()), Arc::new(FakeApi::new()))
    }

    #[test]
    fn repeated_lookup_returns_same_instance() {
        let registry = registry();
        let a = registry.get(ChatId(-1));
        let b = registry.get(ChatId(-1));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn distinct_chats_get_distinct_engines() {
        let registry = registry();
        let a = registry.get(ChatId(-1));
        let b = registry.get(ChatId(-2));
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn engines_are_never_evicted() {
        let registry = registry();
        for i in 0..100 {
            registry.get(ChatId(-i));
        }
        assert_eq!(registry.len(), 100);
    }
}
