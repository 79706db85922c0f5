//! Events that drive a session

use super::state::UserId;
use crate::keyboard::{Action, BUTTON_ABOUT, BUTTON_CALCULATE, BUTTON_CANCEL_ADMIN, BUTTON_CANCEL_CALC, BUTTON_HELP};

/// The user an event originates from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub id: UserId,
    pub username: Option<String>,
    pub full_name: String,
}

/// Where a text message was written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    Private,
    /// Groups, supergroups and channels
    Group,
}

/// Which half of the administrator relay a delivery belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayLeg {
    /// A user's message forwarded to the administrator
    ToAdmin { from: UserId },
    /// The administrator's reply to a user
    ToUser { user_id: UserId, text: String },
}

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    Text {
        sender: Sender,
        chat_kind: ChatKind,
        text: String,
    },
    Button {
        sender: Sender,
        action: Action,
    },
    /// A message without text (sticker, photo, voice...)
    NonText {
        chat_kind: ChatKind,
    },

    // Relay events, reported back by the runtime after a delivery attempt
    RelayDelivered {
        leg: RelayLeg,
    },
    RelayFailed {
        leg: RelayLeg,
        cause: String,
    },
}

/// Slash commands understood by the bot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Calc,
    Admin,
}

/// Buttons of the main reply keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuButton {
    Calculate,
    Help,
    About,
}

/// What a text message means before the session state is considered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<'a> {
    Cancel,
    Command(Command),
    Menu(MenuButton),
    /// Anything else, including unknown commands
    Text(&'a str),
}

impl<'a> Input<'a> {
    pub fn classify(text: &'a str) -> Self {
        let trimmed = text.trim();

        if trimmed == BUTTON_CANCEL_CALC || trimmed == BUTTON_CANCEL_ADMIN {
            return Input::Cancel;
        }

        match trimmed {
            BUTTON_CALCULATE => return Input::Menu(MenuButton::Calculate),
            BUTTON_HELP => return Input::Menu(MenuButton::Help),
            BUTTON_ABOUT => return Input::Menu(MenuButton::About),
            _ => {}
        }

        if let Some(command) = trimmed.strip_prefix('/') {
            // "/calc@my_bot 12" -> "calc"
            let name = command
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .split('@')
                .next()
                .unwrap_or_default();
            match name.to_ascii_lowercase().as_str() {
                "cancel" => return Input::Cancel,
                "start" => return Input::Command(Command::Start),
                "help" => return Input::Command(Command::Help),
                "calc" => return Input::Command(Command::Calc),
                "admin" => return Input::Command(Command::Admin),
                _ => {}
            }
        }

        Input::Text(text)
    }
}
