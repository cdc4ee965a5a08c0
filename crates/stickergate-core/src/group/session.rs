//! One challenge lifecycle per (chat, user).
//!
//! [`Group::on_join`] runs the whole session: set the pending flag, post
//! the challenge, then race the chat's timeout against an external
//! resolution delivered through a oneshot channel. The sending half lives
//! in the engine's resolver map; whoever removes it from the map first
//! owns the resolution, so a timeout firing concurrently with a sticker
//! can never double-resolve.
//!
//! Pending flags are durable but resolvers are not: a user who joined
//! before a process restart has a pending flag with no live session, so
//! their sticker still passes them (the flag gates `on_pass`) but nobody
//! times them out. An admin can reconcile with /pass, /fail, or /reverify.

use stickergate_types::chat::{FailAction, Message, User};
use tokio::sync::oneshot;

use std::sync::Arc;

use crate::bot_api::BotApi;
use crate::storage::KvStore;

use super::engine::Group;

/// Sticker the bot sends to itself to prove its own liveness after being
/// re-verified.
const SELF_PROOF_STICKER: &str =
    "CAACAgUAAxkBAAEI_IFgKqYpeH28bSvB_qd3ybC5vS-RxwACsgADVl_YH824--1Q953HHgQ";

/// How a session ended, as seen by the resolver channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Resolution {
    Passed,
    Failed,
}

impl<S: KvStore, B: BotApi> Group<S, B> {
    /// Run one verification session for `user`, triggered by `join_msg`.
    ///
    /// Returns when the session is resolved or timed out; side effects of
    /// pass/fail live in [`Group::on_pass`] / [`Group::on_fail`].
    pub(super) async fn on_join(self: &Arc<Self>, join_msg: &Message, user: &User) {
        if self.is_pending(user.id).await {
            tracing::info!(chat = %self.chat, user = %user.id, "verification already pending, ignoring join");
            return;
        }
        tracing::info!(chat = %self.chat, user = %user.id, msg = %join_msg.message_id, "starting verification");

        self.set_pending(user.id).await;
        let challenge = self
            .send(
                &self.render_template("onjoin", user).await,
                Some(join_msg.message_id),
            )
            .await;

        let (tx, rx) = oneshot::channel();
        self.resolvers.insert(user.id, tx);

        // The bot verifying itself cannot send a sticker by hand, so it
        // issues its own proof and resolves through the normal pass path.
        if user.id == self.api.me().id {
            match self.api.send_sticker(self.chat, SELF_PROOF_STICKER).await {
                Ok(proof) => self.on_pass(&proof, user).await,
                Err(err) => {
                    tracing::warn!(%err, chat = %self.chat, "self-proof sticker failed");
                }
            }
        }

        let timeout = self.timeout().await;
        let resolution = tokio::select! {
            _ = tokio::time::sleep(timeout) => None,
            res = rx => match res {
                Ok(resolution) => Some(resolution),
                Err(_) => {
                    // Sender dropped without resolving: another session
                    // claimed the slot. Nothing left to do here.
                    tracing::warn!(chat = %self.chat, user = %user.id, "resolver dropped, discarding session");
                    return;
                }
            },
        };

        if !self.verbose().await {
            if let Some(challenge) = challenge {
                self.delete(challenge).await;
            }
        }

        match resolution {
            Some(Resolution::Passed) => {}
            Some(Resolution::Failed) => {
                if !self.verbose().await {
                    self.delete(join_msg.message_id).await;
                }
            }
            None => {
                // Timed out. Claim the resolver slot; losing the claim
                // means a concurrent resolution won the race.
                if self.resolvers.remove(&user.id).is_none() {
                    tracing::info!(chat = %self.chat, user = %user.id, "resolved concurrently, discarding timeout");
                    return;
                }
                if !self.verbose().await {
                    self.delete(join_msg.message_id).await;
                }
                self.on_fail(user).await;
            }
        }
    }

    /// Resolve `user`'s session as passed, triggered by `msg` (their
    /// sticker, or an admin's /pass command).
    ///
    /// No-op when no verification is pending, so duplicate or late
    /// signals are harmless.
    pub(super) async fn on_pass(self: &Arc<Self>, msg: &Message, user: &User) {
        if !self.is_pending(user.id).await {
            tracing::debug!(chat = %self.chat, user = %user.id, "pass signal with no pending verification");
            return;
        }
        tracing::info!(chat = %self.chat, user = %user.id, msg = %msg.message_id, "verification passed");

        self.clear_pending(user.id).await;
        if let Some((_, tx)) = self.resolvers.remove(&user.id) {
            let _ = tx.send(Resolution::Passed);
        }

        if self.quiet().await {
            self.delete(msg.message_id).await;
            return;
        }
        let reply = self
            .send(
                &self.render_template("onpass", user).await,
                Some(msg.message_id),
            )
            .await;
        if self.verbose().await {
            return;
        }
        if let Some(reply) = reply {
            let group = Arc::clone(self);
            let linger = self.timeout().await;
            tokio::spawn(async move {
                tokio::time::sleep(linger).await;
                group.delete(reply).await;
            });
        }
    }

    /// Resolve `user`'s session as failed and apply the configured action.
    ///
    /// No-op when no verification is pending.
    pub(super) async fn on_fail(self: &Arc<Self>, user: &User) {
        if !self.is_pending(user.id).await {
            tracing::debug!(chat = %self.chat, user = %user.id, "fail signal with no pending verification");
            return;
        }
        tracing::info!(chat = %self.chat, user = %user.id, "verification failed");

        self.clear_pending(user.id).await;
        if let Some((_, tx)) = self.resolvers.remove(&user.id) {
            let _ = tx.send(Resolution::Failed);
        }

        match self.action().await {
            FailAction::Kick => {
                self.ban(user.id).await;
                self.unban(user.id).await;
            }
            FailAction::Mute => {
                self.mute(user.id).await;
            }
            FailAction::Ban => {
                self.ban(user.id).await;
            }
        }
        self.invalidate_role(user.id).await;

        if self.quiet().await {
            return;
        }
        let notice = self
            .send(&self.render_template("onfail", user).await, None)
            .await;
        if self.verbose().await {
            return;
        }
        if let Some(notice) = notice {
            let group = Arc::clone(self);
            let linger = self.timeout().await;
            tokio::spawn(async move {
                tokio::time::sleep(linger).await;
                group.delete(notice).await;
            });
        }
    }
}
