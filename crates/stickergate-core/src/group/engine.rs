//! The per-chat engine: update handling, verification routing, command
//! dispatch, and the role cache.
//!
//! One [`Group`] exists per chat (see the registry). It owns the resolver
//! map that connects external signals to in-flight sessions; everything
//! else it needs is reached through the store and the chat platform
//! adapter.

use chrono::Utc;
use dashmap::DashMap;
use futures_util::future::join_all;
use stickergate_types::chat::{
    ChatId, ChatKind, ChatMember, FailAction, MemberStatus, Message, MessageId, Role, User, UserId,
};
use tokio::sync::oneshot;

use std::sync::Arc;
use std::time::Duration;

use crate::bot_api::BotApi;
use crate::i18n;
use crate::storage::KvStore;

use super::command::parse_command;
use super::render::{escape_html, render};
use super::session::Resolution;

/// Cached roles live this long before the next lookup refreshes them.
const ROLE_TTL: Duration = Duration::from_secs(120);

/// Pause between membership lookup retries. Retries are unbounded: the
/// engine cannot make a verification decision without a known role, so a
/// persistent platform outage spins here rather than guessing.
const ROLE_RETRY_PAUSE: Duration = Duration::from_millis(500);

/// Largest accepted /timeout value (fits a signed 32-bit integer).
const MAX_TIMEOUT_SECS: i64 = 2_147_483_647;

/// Help text assembly, in display order. Empty entries are blank lines.
const HELP_LINES: &[&str] = &[
    "help.title",
    "",
    "help.help",
    "ping.help",
    "refresh.help",
    "",
    "status.help",
    "enable.help",
    "disable.help",
    "",
    "lang.help",
    "timeout.help",
    "action.help",
    "",
    "onjoin.help",
    "onpass.help",
    "onfail.help",
    "template.help",
    "",
    "verbose.help",
    "quiet.help",
    "debug.help",
    "",
    "reverify.help",
    "pass.help",
    "fail.help",
    "",
    "id.help",
];

/// The verification engine for one chat.
pub struct Group<S, B> {
    pub(super) chat: ChatId,
    pub(super) store: Arc<S>,
    pub(super) api: Arc<B>,
    /// One single-use resolution handle per user mid-challenge. The first
    /// caller to remove an entry owns the resolution.
    pub(super) resolvers: DashMap<UserId, oneshot::Sender<Resolution>>,
}

impl<S: KvStore, B: BotApi> Group<S, B> {
    pub fn new(chat: ChatId, store: Arc<S>, api: Arc<B>) -> Self {
        Self {
            chat,
            store,
            api,
            resolvers: DashMap::new(),
        }
    }

    /// Entry point for one inbound message.
    pub async fn handle_message(self: &Arc<Self>, m: &Message) {
        if self.debug().await {
            tracing::debug!(
                chat = %self.chat,
                msg = %m.message_id,
                from = ?m.from.as_ref().map(|u| u.id),
                joins = m.new_chat_members.len(),
                sticker = m.sticker.is_some(),
                "update"
            );
        }
        for user in &m.new_chat_members {
            self.invalidate_role(user.id).await;
            // The bot itself (re)joining means its rights are unknown
            // again; force /enable to re-validate them.
            if user.id == self.api.me().id {
                self.del_key("enabled").await;
            }
        }
        if self.handle_verification(m).await {
            return;
        }
        self.handle_command(m).await;
    }

    /// Verification routing. Returns true when the update was claimed.
    async fn handle_verification(self: &Arc<Self>, m: &Message) -> bool {
        if let Some(from) = &m.from {
            if self.is_pending(from.id).await {
                if m.sticker.is_some() {
                    self.on_pass(m, from).await;
                } else {
                    // Mid-challenge chatter is suppressed, not resolved.
                    self.delete(m.message_id).await;
                }
                return true;
            }
        }
        if !self.enabled().await {
            return false;
        }
        if m.new_chat_members.is_empty() {
            return false;
        }
        // Fresh check right before sessions start: stale admin rights
        // here would strand every joining user.
        if self.get_role(self.api.me().id, true).await != Role::Admin {
            self.del_key("enabled").await;
            let text = self.fmt("bot.angry", &[]).await;
            self.send(&text, None).await;
            self.leave().await;
            return true;
        }
        join_all(m.new_chat_members.iter().map(|u| self.on_join(m, u))).await;
        true
    }

    /// Command dispatch. Returns true when the update was claimed.
    async fn handle_command(self: &Arc<Self>, m: &Message) -> bool {
        let Some(text) = &m.text else { return false };
        let Some((cmd, arg)) = parse_command(text, &self.api.me().username) else {
            return false;
        };

        match cmd.as_str() {
            "start" | "help" => {
                let mut lines = Vec::with_capacity(HELP_LINES.len());
                for key in HELP_LINES {
                    if key.is_empty() {
                        lines.push(String::new());
                    } else {
                        lines.push(self.fmt(key, &[]).await);
                    }
                }
                self.send(&lines.join("\n"), Some(m.message_id)).await;
            }

            "ping" => {
                let latency = format!("{}s", (Utc::now().timestamp() - m.date).max(0));
                let text = self.fmt("ping.pong", &[&latency]).await;
                self.send(&text, Some(m.message_id)).await;
            }

            "refresh" => {
                let target = m
                    .reply_to_message
                    .as_ref()
                    .and_then(|r| r.from.as_ref())
                    .or(m.from.as_ref());
                if let Some(user) = target {
                    self.invalidate_role(user.id).await;
                }
                self.delete(m.message_id).await;
            }

            "status" => {
                if !self.check_from_admin(m, false).await {
                    return true;
                }
                let key = if self.enabled().await {
                    "status.enable"
                } else {
                    "status.disable"
                };
                let text = self.fmt(key, &[]).await;
                self.send(&text, Some(m.message_id)).await;
            }

            "enable" => {
                if !self.check_from_admin(m, false).await {
                    return true;
                }
                // Fresh check: the cached self-role may predate a rights
                // revocation.
                if self.get_role(self.api.me().id, true).await != Role::Admin {
                    let text = self.fmt("bot.not_admin", &[]).await;
                    self.send(&text, Some(m.message_id)).await;
                    return true;
                }
                self.set_key("enabled", "true", None).await;
                let text = self.fmt("status.enable", &[]).await;
                self.send(&text, Some(m.message_id)).await;
            }

            "disable" => {
                if !self.check_from_admin(m, false).await {
                    return true;
                }
                self.del_key("enabled").await;
                let text = self.fmt("status.disable", &[]).await;
                self.send(&text, Some(m.message_id)).await;
            }

            "lang" => {
                if !self.check_from_admin(m, true).await {
                    return true;
                }
                if let Some(arg) = arg {
                    self.set_key("lang", arg, None).await;
                }
                let lang = self.lang().await;
                let text = self.fmt("lang.query", &[&lang, &i18n::all_langs()]).await;
                self.send(&text, Some(m.message_id)).await;
            }

            "action" => {
                if !self.check_from_admin(m, false).await {
                    return true;
                }
                if let Some(arg) = arg {
                    if arg.parse::<FailAction>().is_err() {
                        let text = self.fmt("cmd.bad_param", &[]).await;
                        self.send(&text, Some(m.message_id)).await;
                        return true;
                    }
                    self.set_key("action", arg, None).await;
                }
                let action = self.action().await;
                let name = self.fmt(&format!("action.{action}"), &[]).await;
                let text = self.fmt("action.query", &[&name]).await;
                self.send(&text, Some(m.message_id)).await;
            }

            "timeout" => {
                if !self.check_from_admin(m, false).await {
                    return true;
                }
                if let Some(arg) = arg {
                    match arg.parse::<i64>() {
                        Ok(t) if t > 0 && t <= MAX_TIMEOUT_SECS => {
                            self.set_key("timeout", arg, None).await;
                        }
                        _ => {
                            let text = self.fmt("cmd.bad_param", &[]).await;
                            self.send(&text, Some(m.message_id)).await;
                            return true;
                        }
                    }
                }
                let t = self.timeout_secs().await;
                let mut text = self.fmt("timeout.query", &[&t.to_string()]).await;
                if t < 10 {
                    text.push_str("\n\n");
                    text.push_str(&self.fmt("timeout.notice", &[]).await);
                }
                self.send(&text, Some(m.message_id)).await;
            }

            "onjoin" | "onpass" | "onfail" => {
                if !self.check_from_admin(m, false).await {
                    return true;
                }
                if let Some(arg) = arg {
                    self.set_key(&format!("{cmd}:template"), arg, None).await;
                }
                let template = self.template(&cmd).await;
                let text = self
                    .fmt(&format!("{cmd}.query"), &[&escape_html(&template)])
                    .await;
                self.send(&text, Some(m.message_id)).await;
            }

            "verbose" | "quiet" => {
                if !self.check_from_admin(m, false).await {
                    return true;
                }
                let conflict = if cmd == "verbose" { "quiet" } else { "verbose" };
                match arg {
                    Some("on") => {
                        self.set_key(&cmd, "true", None).await;
                        self.del_key(conflict).await;
                        let text = self.fmt(&format!("{cmd}.on"), &[]).await;
                        self.send(&text, Some(m.message_id)).await;
                    }
                    Some("off") => {
                        self.del_key(&cmd).await;
                        let text = self.fmt(&format!("{cmd}.off"), &[]).await;
                        self.send(&text, Some(m.message_id)).await;
                    }
                    None => {
                        let state = if self.exists_key(&cmd).await { "on" } else { "off" };
                        let text = self.fmt(&format!("{cmd}.{state}"), &[]).await;
                        self.send(&text, Some(m.message_id)).await;
                    }
                    Some(_) => {
                        let text = self.fmt("cmd.bad_param", &[]).await;
                        self.send(&text, Some(m.message_id)).await;
                    }
                }
            }

            "debug" => {
                if !self.check_from_admin(m, false).await {
                    return true;
                }
                match arg {
                    Some("on") => {
                        self.set_key("debug", "true", None).await;
                        let text = self.fmt("debug.on", &[]).await;
                        self.send(&text, Some(m.message_id)).await;
                    }
                    Some("off") => {
                        self.del_key("debug").await;
                        let text = self.fmt("debug.off", &[]).await;
                        self.send(&text, Some(m.message_id)).await;
                    }
                    None => {
                        let state = if self.debug().await { "debug.on" } else { "debug.off" };
                        let text = self.fmt(state, &[]).await;
                        self.send(&text, Some(m.message_id)).await;
                    }
                    Some(_) => {
                        let text = self.fmt("cmd.bad_param", &[]).await;
                        self.send(&text, Some(m.message_id)).await;
                    }
                }
            }

            "reverify" => {
                if !self.check_from_admin(m, false).await || !self.check_has_reply(m).await {
                    return true;
                }
                let Some(replied) = m.reply_to_message.as_deref() else {
                    return true;
                };
                if !replied.new_chat_members.is_empty() {
                    join_all(
                        replied
                            .new_chat_members
                            .iter()
                            .map(|u| self.on_join(replied, u)),
                    )
                    .await;
                } else if let Some(user) = &replied.from {
                    self.on_join(replied, user).await;
                }
            }

            "pass" => {
                if !self.check_from_admin(m, false).await || !self.check_has_reply(m).await {
                    return true;
                }
                let Some(replied) = m.reply_to_message.as_deref() else {
                    return true;
                };
                if !replied.new_chat_members.is_empty() {
                    join_all(replied.new_chat_members.iter().map(|u| self.on_pass(m, u))).await;
                } else if let Some(user) = &replied.from {
                    self.on_pass(m, user).await;
                }
            }

            "fail" => {
                if !self.check_from_admin(m, false).await || !self.check_has_reply(m).await {
                    return true;
                }
                let Some(replied) = m.reply_to_message.as_deref() else {
                    return true;
                };
                if !replied.new_chat_members.is_empty() {
                    join_all(replied.new_chat_members.iter().map(|u| self.on_fail(u))).await;
                } else if let Some(user) = &replied.from {
                    self.on_fail(user).await;
                }
            }

            "id" => {
                self.send(&format!("<code>{}</code>", self.chat), Some(m.message_id))
                    .await;
            }

            _ => return false,
        }

        true
    }

    /// Gate for admin commands: group chat (unless `allow_private`) and an
    /// `admin` caller. Failing either sends the localized refusal.
    async fn check_from_admin(&self, m: &Message, allow_private: bool) -> bool {
        if m.chat.kind == ChatKind::Private {
            if allow_private {
                return true;
            }
            let text = self.fmt("cmd.not_in_group", &[]).await;
            self.send(&text, Some(m.message_id)).await;
            return false;
        }
        let sender = match &m.from {
            Some(user) => user.id,
            None => return false,
        };
        if self.get_role(sender, false).await != Role::Admin {
            let text = self.fmt("cmd.not_admin", &[]).await;
            self.send(&text, Some(m.message_id)).await;
            return false;
        }
        true
    }

    async fn check_has_reply(&self, m: &Message) -> bool {
        if m.reply_to_message.is_some() {
            return true;
        }
        let text = self.fmt("cmd.need_reply", &[]).await;
        self.send(&text, Some(m.message_id)).await;
        false
    }

    /// Cache-through role lookup, 120s TTL.
    ///
    /// `force_refresh` bypasses the cache (used for the bot's own role
    /// before feature activation). Transient lookup failures retry
    /// forever; a non-participant answer is a successful lookup.
    pub(super) async fn get_role(&self, user: UserId, force_refresh: bool) -> Role {
        let key = format!("user:{user}:role");
        if !force_refresh {
            if let Some(cached) = self.get_key(&key).await {
                match cached.parse::<Role>() {
                    Ok(role) => return role,
                    Err(err) => {
                        tracing::warn!(%err, chat = %self.chat, %user, "invalid cached role, refreshing");
                    }
                }
            }
        }
        let member = loop {
            match self.api.get_chat_member(self.chat, user).await {
                Ok(member) => break member,
                Err(err) => {
                    tracing::warn!(%err, chat = %self.chat, %user, "membership lookup failed, retrying");
                    tokio::time::sleep(ROLE_RETRY_PAUSE).await;
                }
            }
        };
        let role = classify(member.as_ref());
        self.set_key(&key, role.as_str(), Some(ROLE_TTL)).await;
        role
    }

    pub(super) async fn render_template(&self, hook: &str, user: &User) -> String {
        let template = self.template(hook).await;
        render(&template, user, self.timeout_secs().await)
    }

    // Adapter wrappers. Failures are logged and degrade to neutral values
    // so a flaky platform never aborts a session mid-flight.

    pub(super) async fn send(&self, html: &str, reply_to: Option<MessageId>) -> Option<MessageId> {
        match self.api.send_message(self.chat, html, reply_to).await {
            Ok(id) => Some(id),
            Err(err) => {
                tracing::warn!(%err, chat = %self.chat, "send_message failed");
                None
            }
        }
    }

    pub(super) async fn delete(&self, message: MessageId) -> bool {
        match self.api.delete_message(self.chat, message).await {
            Ok(deleted) => deleted,
            Err(err) => {
                tracing::warn!(%err, chat = %self.chat, %message, "delete_message failed");
                false
            }
        }
    }

    pub(super) async fn mute(&self, user: UserId) -> bool {
        match self.api.restrict_member(self.chat, user).await {
            Ok(done) => done,
            Err(err) => {
                tracing::warn!(%err, chat = %self.chat, %user, "restrict_member failed");
                false
            }
        }
    }

    pub(super) async fn ban(&self, user: UserId) -> bool {
        match self.api.ban_member(self.chat, user).await {
            Ok(done) => done,
            Err(err) => {
                tracing::warn!(%err, chat = %self.chat, %user, "ban_member failed");
                false
            }
        }
    }

    pub(super) async fn unban(&self, user: UserId) -> bool {
        match self.api.unban_member(self.chat, user).await {
            Ok(done) => done,
            Err(err) => {
                tracing::warn!(%err, chat = %self.chat, %user, "unban_member failed");
                false
            }
        }
    }

    async fn leave(&self) -> bool {
        match self.api.leave_chat(self.chat).await {
            Ok(done) => done,
            Err(err) => {
                tracing::warn!(%err, chat = %self.chat, "leave_chat failed");
                false
            }
        }
    }
}

/// Classify a membership answer into a [`Role`].
fn classify(member: Option<&ChatMember>) -> Role {
    match member {
        None => Role::None,
        Some(m) if m.status == MemberStatus::Creator || m.can_restrict_members.unwrap_or(false) => {
            Role::Admin
        }
        Some(m) if matches!(m.status, MemberStatus::Left | MemberStatus::Kicked) => Role::None,
        Some(_) => Role::Member,
    }
}
