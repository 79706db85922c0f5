//! Runtime for dispatching inbound events
//!
//! Owns the session store, feeds events through the pure state machine and
//! executes the resulting effects against a [`Transport`].

mod executor;
mod store;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::Dispatcher;
pub use store::SessionStore;
pub use traits::*;

use crate::keyboard::Action;
use crate::state_machine::{ChatId, ChatKind, Sender};

/// Transport-neutral inbound event
#[derive(Debug, Clone)]
pub enum Incoming {
    /// A message in any chat; `text` is `None` for stickers, photos and
    /// other non-text content
    Message {
        chat: ChatId,
        chat_kind: ChatKind,
        sender: Sender,
        text: Option<String>,
    },
    /// An inline button press; `action` is `None` when the payload is not ours
    Button {
        callback_id: String,
        chat: ChatId,
        sender: Sender,
        action: Option<Action>,
    },
    /// A query typed after the bot's `@username` in any chat
    InlineQuery {
        query_id: String,
        sender: Sender,
        query: String,
    },
    /// The bot was added to a group chat
    AddedToGroup { chat: ChatId, title: Option<String> },
}
