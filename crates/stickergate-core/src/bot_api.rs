//! Chat platform adapter trait.
//!
//! The engine talks to the chat platform exclusively through this trait.
//! The HTTP implementation lives in stickergate-infra; tests use a
//! recording fake.

use stickergate_types::chat::{BotIdentity, ChatId, ChatMember, Message, MessageId, UserId};
use stickergate_types::error::ApiError;

/// Operations the verification engine needs from the chat platform.
///
/// Every operation is fallible. Callers in the engine log failures and
/// degrade to neutral values (no message id, `false`), with one exception:
/// membership lookups are retried by the caller because verification cannot
/// proceed without a known role. `get_chat_member` returning `Ok(None)`
/// means the platform answered and the user is not a participant -- that is
/// a successful lookup, not a transient failure.
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait BotApi: Send + Sync + 'static {
    /// The bot's own identity, fetched once at startup and cached.
    fn me(&self) -> &BotIdentity;

    /// Send an HTML-formatted message, optionally as a reply.
    fn send_message(
        &self,
        chat: ChatId,
        html: &str,
        reply_to: Option<MessageId>,
    ) -> impl std::future::Future<Output = Result<MessageId, ApiError>> + Send;

    /// Send a sticker by file id. Used for the bot's own self-test proof.
    fn send_sticker(
        &self,
        chat: ChatId,
        file_id: &str,
    ) -> impl std::future::Future<Output = Result<Message, ApiError>> + Send;

    fn delete_message(
        &self,
        chat: ChatId,
        message: MessageId,
    ) -> impl std::future::Future<Output = Result<bool, ApiError>> + Send;

    /// Revoke the user's permission to send messages.
    fn restrict_member(
        &self,
        chat: ChatId,
        user: UserId,
    ) -> impl std::future::Future<Output = Result<bool, ApiError>> + Send;

    fn ban_member(
        &self,
        chat: ChatId,
        user: UserId,
    ) -> impl std::future::Future<Output = Result<bool, ApiError>> + Send;

    fn unban_member(
        &self,
        chat: ChatId,
        user: UserId,
    ) -> impl std::future::Future<Output = Result<bool, ApiError>> + Send;

    /// Membership lookup. `Ok(None)` = the user is not a participant.
    fn get_chat_member(
        &self,
        chat: ChatId,
        user: UserId,
    ) -> impl std::future::Future<Output = Result<Option<ChatMember>, ApiError>> + Send;

    fn leave_chat(
        &self,
        chat: ChatId,
    ) -> impl std::future::Future<Output = Result<bool, ApiError>> + Send;
}
