//! Telegram Bot API adapter.

mod client;
mod types;

pub use client::TelegramClient;
