//! # shelfbot
//!
//! A chat-driven client for a remote file-storage service: shell-like
//! commands arrive as Telegram messages, are interpreted against a
//! per-user navigation session, and turn into calls on the service's
//! HTTP API.
//!
//! ## Commands
//!
//! - **Navigation**: `pwd`, `ls`, `tree`, `cd <folder>` (with `cd ..`)
//! - **Mutation**: `mkdir <folder>`, `mv <src> <dest>`, `cp <src> <dest>`
//! - **Transfers**: `upload <filename>` followed by sending the file,
//!   `download <file>` delivered back as a document
//!
//! ## Architecture
//!
//! Inbound events are routed by the [`bot::Dispatcher`] to one worker
//! task per user; each worker owns that user's [`session::Session`] and
//! handles its events strictly in order. Commands execute against the
//! [`api::Storage`] seam, whose HTTP implementation is
//! [`api::StorageClient`]; replies go back through the [`bot::Transport`]
//! seam. Uploads relay through a scoped temp file that is removed on
//! every exit path.

pub mod api;
pub mod bot;
pub mod config;
pub mod error;
pub mod http;
pub mod interp;
pub mod paths;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use api::{RemoteEntry, Storage, StorageClient, TransferOp};
pub use bot::{Dispatcher, Event, TelegramTransport, Transport};
pub use config::Config;
pub use error::{BotError, Result};
pub use interp::{Command, Reply};
pub use session::{PendingUpload, Session};
