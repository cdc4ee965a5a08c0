//! TelegramClient -- concrete [`BotApi`] implementation over the Bot HTTP
//! API.
//!
//! Authenticates with `getMe` at construction, so a bad token is caught at
//! startup instead of on the first send. The token is wrapped in
//! [`secrecy::SecretString`] and never appears in Debug output or logs;
//! every call logs its method and latency.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use stickergate_core::bot_api::BotApi;
use stickergate_types::chat::{
    BotIdentity, ChatId, ChatMember, Message, MessageId, Update, User, UserId,
};
use stickergate_types::error::ApiError;

use std::time::{Duration, Instant};

use super::types::{
    ApiResponse, ChatPermissions, ChatRef, Empty, GetUpdatesRequest, MemberRef, MessageRef,
    RestrictRequest, SendMessageRequest, SendStickerRequest,
};

/// Telegram Bot API client.
pub struct TelegramClient {
    client: reqwest::Client,
    token: SecretString,
    base_url: String,
    me: BotIdentity,
}

impl TelegramClient {
    /// Authenticate against the Bot API and build a client.
    ///
    /// `poll_timeout_secs` is the long-poll timeout `get_updates` will use;
    /// the HTTP timeout is set above it so long polls are not cut short.
    pub async fn connect(
        token: SecretString,
        base_url: String,
        poll_timeout_secs: u64,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(poll_timeout_secs + 10))
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let me: User = request(&client, &base_url, &token, "getMe", &Empty {}).await?;
        let username = me
            .username
            .ok_or_else(|| ApiError::Decode("bot account has no username".to_string()))?;

        Ok(Self {
            client,
            token,
            base_url,
            me: BotIdentity {
                id: me.id,
                username,
                first_name: me.first_name,
            },
        })
    }

    /// Override the base URL (useful for testing or local Bot API servers).
    #[allow(dead_code)]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    async fn call<T: DeserializeOwned, P: Serialize>(
        &self,
        method: &str,
        payload: &P,
    ) -> Result<T, ApiError> {
        request(&self.client, &self.base_url, &self.token, method, payload).await
    }

    /// Long-poll inbound updates. Blocks up to `timeout_secs` server-side.
    pub async fn get_updates(
        &self,
        offset: i64,
        limit: i64,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, ApiError> {
        self.call(
            "getUpdates",
            &GetUpdatesRequest {
                offset,
                limit,
                timeout: timeout_secs,
                allowed_updates: &["message"],
            },
        )
        .await
    }
}

/// One Bot API method call: POST the payload, unwrap the envelope.
async fn request<T: DeserializeOwned, P: Serialize>(
    client: &reqwest::Client,
    base_url: &str,
    token: &SecretString,
    method: &str,
    payload: &P,
) -> Result<T, ApiError> {
    let url = format!("{base_url}/bot{}/{method}", token.expose_secret());
    let started = Instant::now();

    let result = async {
        let response = client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        if !envelope.ok {
            return Err(ApiError::Api {
                code: envelope.error_code.unwrap_or(0),
                description: envelope.description.unwrap_or_default(),
            });
        }
        envelope
            .result
            .ok_or_else(|| ApiError::Decode("ok response without result".to_string()))
    }
    .await;

    let elapsed_ms = started.elapsed().as_millis();
    match &result {
        Ok(_) => tracing::debug!(method, elapsed_ms, "api call ok"),
        Err(err) => tracing::warn!(method, elapsed_ms, %err, "api call failed"),
    }
    result
}

impl BotApi for TelegramClient {
    fn me(&self) -> &BotIdentity {
        &self.me
    }

    async fn send_message(
        &self,
        chat: ChatId,
        html: &str,
        reply_to: Option<MessageId>,
    ) -> Result<MessageId, ApiError> {
        let message: Message = self
            .call(
                "sendMessage",
                &SendMessageRequest {
                    chat_id: chat.0,
                    text: html,
                    parse_mode: "HTML",
                    reply_to_message_id: reply_to.map(|m| m.0),
                },
            )
            .await?;
        Ok(message.message_id)
    }

    async fn send_sticker(&self, chat: ChatId, file_id: &str) -> Result<Message, ApiError> {
        self.call(
            "sendSticker",
            &SendStickerRequest {
                chat_id: chat.0,
                sticker: file_id,
            },
        )
        .await
    }

    async fn delete_message(&self, chat: ChatId, message: MessageId) -> Result<bool, ApiError> {
        self.call(
            "deleteMessage",
            &MessageRef {
                chat_id: chat.0,
                message_id: message.0,
            },
        )
        .await
    }

    async fn restrict_member(&self, chat: ChatId, user: UserId) -> Result<bool, ApiError> {
        self.call(
            "restrictChatMember",
            &RestrictRequest {
                chat_id: chat.0,
                user_id: user.0,
                permissions: ChatPermissions {
                    can_send_messages: false,
                },
            },
        )
        .await
    }

    async fn ban_member(&self, chat: ChatId, user: UserId) -> Result<bool, ApiError> {
        self.call(
            "banChatMember",
            &MemberRef {
                chat_id: chat.0,
                user_id: user.0,
            },
        )
        .await
    }

    async fn unban_member(&self, chat: ChatId, user: UserId) -> Result<bool, ApiError> {
        self.call(
            "unbanChatMember",
            &MemberRef {
                chat_id: chat.0,
                user_id: user.0,
            },
        )
        .await
    }

    async fn get_chat_member(
        &self,
        chat: ChatId,
        user: UserId,
    ) -> Result<Option<ChatMember>, ApiError> {
        let result: Result<ChatMember, ApiError> = self
            .call(
                "getChatMember",
                &MemberRef {
                    chat_id: chat.0,
                    user_id: user.0,
                },
            )
            .await;
        match result {
            Ok(member) => Ok(Some(member)),
            // A 400 means the platform answered and does not know the user
            // here: not a participant. Anything else is transient and left
            // for the caller's retry loop.
            Err(ApiError::Api { code: 400, .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn leave_chat(&self, chat: ChatId) -> Result<bool, ApiError> {
        self.call("leaveChat", &ChatRef { chat_id: chat.0 }).await
    }
}
