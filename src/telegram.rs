//! Telegram Bot API transport
//!
//! HTTPS long polling in, JSON method calls out. Everything platform specific
//! stays in this module; the rest of the bot sees [`Incoming`] values and the
//! [`Transport`] trait.
//!
//! [`Incoming`]: crate::runtime::Incoming
//! [`Transport`]: crate::runtime::Transport

mod client;
mod error;
mod poller;
mod types;

pub use client::TelegramClient;
pub use error::TelegramError;
pub use poller::run_polling;
