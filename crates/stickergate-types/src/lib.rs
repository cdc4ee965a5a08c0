//! Shared domain types for Stickergate.
//!
//! Pure data: id newtypes, the chat message model, closed enums for
//! persisted values, configuration, and error types. No I/O lives here.

pub mod chat;
pub mod config;
pub mod error;
