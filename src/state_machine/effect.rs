//! Effects produced by state transitions

use super::event::RelayLeg;
use super::state::ChatId;
use crate::keyboard::Keyboard;

/// An HTML-formatted message with an optional keyboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl Reply {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Answer in the chat the event came from
    Reply(Reply),

    /// Deliver a message to another chat; the runtime reports the outcome
    /// back as `RelayDelivered` or `RelayFailed` carrying `leg`
    Relay {
        to: ChatId,
        message: Reply,
        leg: RelayLeg,
    },
}

impl Effect {
    pub fn reply(text: impl Into<String>) -> Self {
        Effect::Reply(Reply::new(text))
    }

    pub fn reply_with(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Effect::Reply(Reply::with_keyboard(text, keyboard))
    }
}
