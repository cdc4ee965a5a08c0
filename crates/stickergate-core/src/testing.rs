//! Test doubles shared across engine tests.

use dashmap::DashMap;
use stickergate_types::chat::{
    BotIdentity, Chat, ChatId, ChatKind, ChatMember, MemberStatus, Message, MessageId, Sticker,
    User, UserId,
};
use stickergate_types::error::ApiError;

use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};

use crate::bot_api::BotApi;

/// A message recorded by [`FakeApi::send_message`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Sent {
    pub message_id: MessageId,
    pub chat: ChatId,
    pub html: String,
    pub reply_to: Option<MessageId>,
}

/// Recording [`BotApi`] fake.
///
/// Every operation succeeds and is appended to `log` (as `"<op>:<target>"`)
/// so tests can assert ordering, e.g. a kick showing up as `ban` then
/// `unban`. Membership answers are canned via [`FakeApi::set_member`];
/// [`FakeApi::fail_membership_lookups`] makes the next N lookups return a
/// transport error to exercise the retry path.
#[derive(Debug)]
pub(crate) struct FakeApi {
    me: BotIdentity,
    next_message_id: AtomicI64,
    pub sent: Mutex<Vec<Sent>>,
    pub stickers: Mutex<Vec<String>>,
    pub log: Mutex<Vec<String>>,
    members: DashMap<(ChatId, UserId), ChatMember>,
    membership_lookups: AtomicU32,
    membership_failures: AtomicU32,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            me: BotIdentity {
                id: UserId(1000),
                username: "gatekeeper_bot".to_string(),
                first_name: "Gatekeeper".to_string(),
            },
            next_message_id: AtomicI64::new(100),
            sent: Mutex::new(Vec::new()),
            stickers: Mutex::new(Vec::new()),
            log: Mutex::new(Vec::new()),
            members: DashMap::new(),
            membership_lookups: AtomicU32::new(0),
            membership_failures: AtomicU32::new(0),
        }
    }

    pub fn set_member(&self, chat: ChatId, user: &User, status: MemberStatus, can_restrict: bool) {
        self.members.insert(
            (chat, user.id),
            ChatMember {
                status,
                user: user.clone(),
                can_restrict_members: Some(can_restrict),
            },
        );
    }

    /// Make the next `n` membership lookups fail with a transport error.
    pub fn fail_membership_lookups(&self, n: u32) {
        self.membership_failures.store(n, Ordering::SeqCst);
    }

    pub fn membership_lookup_count(&self) -> u32 {
        self.membership_lookups.load(Ordering::SeqCst)
    }

    pub fn sent_html(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|s| s.html.clone()).collect()
    }

    pub fn log_entries(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn record(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }

    fn next_id(&self) -> MessageId {
        MessageId(self.next_message_id.fetch_add(1, Ordering::SeqCst))
    }
}

/// Chat id used by the engine fixtures.
pub(crate) const TEST_CHAT: ChatId = ChatId(-1001);

pub(crate) fn user(id: i64, name: &str) -> User {
    User {
        id: UserId(id),
        first_name: name.to_string(),
        last_name: None,
        username: None,
        is_bot: false,
    }
}

pub(crate) fn bot_user() -> User {
    User {
        id: UserId(1000),
        first_name: "Gatekeeper".to_string(),
        last_name: None,
        username: Some("gatekeeper_bot".to_string()),
        is_bot: true,
    }
}

pub(crate) fn base_message(id: i64) -> Message {
    Message {
        message_id: MessageId(id),
        date: 0,
        chat: Chat {
            id: TEST_CHAT,
            kind: ChatKind::Supergroup,
        },
        from: None,
        text: None,
        sticker: None,
        new_chat_members: Vec::new(),
        reply_to_message: None,
    }
}

pub(crate) fn join_message(id: i64, users: &[&User]) -> Message {
    let mut m = base_message(id);
    m.from = users.first().map(|u| (*u).clone());
    m.new_chat_members = users.iter().map(|u| (*u).clone()).collect();
    m
}

pub(crate) fn text_message(id: i64, from: &User, text: &str) -> Message {
    let mut m = base_message(id);
    m.from = Some(from.clone());
    m.text = Some(text.to_string());
    m
}

pub(crate) fn sticker_message(id: i64, from: &User) -> Message {
    let mut m = base_message(id);
    m.from = Some(from.clone());
    m.sticker = Some(Sticker {
        file_id: "proof".to_string(),
    });
    m
}

pub(crate) fn reply_to(mut m: Message, replied: &Message) -> Message {
    m.reply_to_message = Some(Box::new(replied.clone()));
    m
}

/// An engine wired to an in-memory store and the recording fake.
pub(crate) struct Fixture {
    pub group: std::sync::Arc<crate::group::Group<crate::storage::MemoryKvStore, FakeApi>>,
    pub api: std::sync::Arc<FakeApi>,
    pub store: std::sync::Arc<crate::storage::MemoryKvStore>,
}

impl Fixture {
    pub fn new() -> Self {
        use std::sync::Arc;
        let api = Arc::new(FakeApi::new());
        let store = Arc::new(crate::storage::MemoryKvStore::new());
        let group = Arc::new(crate::group::Group::new(
            TEST_CHAT,
            Arc::clone(&store),
            Arc::clone(&api),
        ));
        Self { group, api, store }
    }

    /// Verification enabled, bot holding restrict rights.
    pub async fn enabled() -> Self {
        use crate::storage::KvStore;
        let f = Self::new();
        f.store
            .set("chat:-1001:enabled", "true", None)
            .await
            .unwrap();
        f.api
            .set_member(TEST_CHAT, &bot_user(), MemberStatus::Administrator, true);
        f
    }

    /// Like [`Fixture::enabled`], plus a creator-status admin caller.
    pub async fn with_admin() -> (Self, User) {
        let f = Self::enabled().await;
        let admin = user(99, "Root");
        f.api
            .set_member(TEST_CHAT, &admin, MemberStatus::Creator, false);
        (f, admin)
    }
}

impl BotApi for FakeApi {
    fn me(&self) -> &BotIdentity {
        &self.me
    }

    async fn send_message(
        &self,
        chat: ChatId,
        html: &str,
        reply_to: Option<MessageId>,
    ) -> Result<MessageId, ApiError> {
        let message_id = self.next_id();
        self.record(format!("send:{message_id}"));
        self.sent.lock().unwrap().push(Sent {
            message_id,
            chat,
            html: html.to_string(),
            reply_to,
        });
        Ok(message_id)
    }

    async fn send_sticker(&self, chat: ChatId, file_id: &str) -> Result<Message, ApiError> {
        let message_id = self.next_id();
        self.record(format!("sticker:{message_id}"));
        self.stickers.lock().unwrap().push(file_id.to_string());
        Ok(Message {
            message_id,
            date: 0,
            chat: Chat {
                id: chat,
                kind: ChatKind::Supergroup,
            },
            from: Some(self.me.to_user()),
            text: None,
            sticker: Some(Sticker {
                file_id: file_id.to_string(),
            }),
            new_chat_members: Vec::new(),
            reply_to_message: None,
        })
    }

    async fn delete_message(&self, _chat: ChatId, message: MessageId) -> Result<bool, ApiError> {
        self.record(format!("del:{message}"));
        Ok(true)
    }

    async fn restrict_member(&self, _chat: ChatId, user: UserId) -> Result<bool, ApiError> {
        self.record(format!("mute:{user}"));
        Ok(true)
    }

    async fn ban_member(&self, _chat: ChatId, user: UserId) -> Result<bool, ApiError> {
        self.record(format!("ban:{user}"));
        Ok(true)
    }

    async fn unban_member(&self, _chat: ChatId, user: UserId) -> Result<bool, ApiError> {
        self.record(format!("unban:{user}"));
        Ok(true)
    }

    async fn get_chat_member(
        &self,
        chat: ChatId,
        user: UserId,
    ) -> Result<Option<ChatMember>, ApiError> {
        self.membership_lookups.fetch_add(1, Ordering::SeqCst);
        if self.membership_failures.load(Ordering::SeqCst) > 0 {
            self.membership_failures.fetch_sub(1, Ordering::SeqCst);
            return Err(ApiError::Transport("connection reset".to_string()));
        }
        Ok(self.members.get(&(chat, user)).map(|m| m.value().clone()))
    }

    async fn leave_chat(&self, chat: ChatId) -> Result<bool, ApiError> {
        self.record(format!("leave:{chat}"));
        Ok(true)
    }
}
