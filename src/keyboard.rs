//! Keyboard specifications and typed button payloads
//!
//! The core only describes keyboards; rendering them into wire markup is the
//! transport's job.

use crate::state_machine::UserId;
use serde::{Deserialize, Serialize};

pub const BUTTON_CALCULATE: &str = "🎯 Calculate win rate";
pub const BUTTON_HELP: &str = "📖 Help";
pub const BUTTON_ABOUT: &str = "ℹ️ About";
pub const BUTTON_CANCEL_CALC: &str = "❌ Cancel calculation";
pub const BUTTON_CANCEL_ADMIN: &str = "❌ Cancel sending";

/// Payload carried by an inline button back to the bot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    StartCalc,
    ShowHelp,
    About,
    ConfirmAdminMessage,
    RejectAdminMessage,
    /// Administrator reply affordance; routes the reply to `user_id`
    ReplyTo { user_id: UserId },
}

impl Action {
    /// Encode for the transport's opaque callback data field
    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Decode callback data produced by [`Action::encode`]
    pub fn decode(data: &str) -> Option<Self> {
        serde_json::from_str(data).ok()
    }
}

/// A single inline button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub action: Action,
}

impl InlineButton {
    fn new(label: &str, action: Action) -> Self {
        Self {
            label: label.to_string(),
            action,
        }
    }
}

/// Keyboard attached to an outbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// Persistent keyboard replacing the user's text keyboard
    Reply {
        rows: Vec<Vec<String>>,
        placeholder: Option<String>,
    },
    /// Buttons attached to the message itself
    Inline { rows: Vec<Vec<InlineButton>> },
}

impl Keyboard {
    pub fn main_menu() -> Self {
        Keyboard::Reply {
            rows: vec![
                vec![BUTTON_CALCULATE.to_string(), BUTTON_HELP.to_string()],
                vec![BUTTON_ABOUT.to_string()],
            ],
            placeholder: None,
        }
    }

    pub fn cancel_calculation() -> Self {
        Keyboard::Reply {
            rows: vec![vec![BUTTON_CANCEL_CALC.to_string()]],
            placeholder: Some("Enter a value or cancel...".to_string()),
        }
    }

    pub fn cancel_admin_message() -> Self {
        Keyboard::Reply {
            rows: vec![vec![BUTTON_CANCEL_ADMIN.to_string()]],
            placeholder: Some("Write your message...".to_string()),
        }
    }

    pub fn quick_start() -> Self {
        Keyboard::Inline {
            rows: vec![
                vec![
                    InlineButton::new("🎯 Start calculation", Action::StartCalc),
                    InlineButton::new("📖 Help", Action::ShowHelp),
                ],
                vec![InlineButton::new("ℹ️ About", Action::About)],
            ],
        }
    }

    pub fn after_result() -> Self {
        Keyboard::Inline {
            rows: vec![vec![
                InlineButton::new("🔄 New calculation", Action::StartCalc),
                InlineButton::new("📊 Help", Action::ShowHelp),
            ]],
        }
    }

    pub fn confirm_admin_message() -> Self {
        Keyboard::Inline {
            rows: vec![vec![
                InlineButton::new("✅ Yes, send", Action::ConfirmAdminMessage),
                InlineButton::new("❌ No, cancel", Action::RejectAdminMessage),
            ]],
        }
    }

    pub fn reply_to(user_id: UserId) -> Self {
        Keyboard::Inline {
            rows: vec![vec![InlineButton::new(
                "💬 Reply to user",
                Action::ReplyTo { user_id },
            )]],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Telegram rejects callback data longer than this
    const CALLBACK_DATA_LIMIT: usize = 64;

    #[test]
    fn test_reply_to_payload_carries_identity() {
        let action = Action::ReplyTo {
            user_id: UserId(1_234_567_890),
        };
        let encoded = action.encode();
        assert_eq!(encoded, r#"{"kind":"reply_to","user_id":1234567890}"#);
        assert_eq!(Action::decode(&encoded), Some(action));
    }

    #[test]
    fn test_largest_payload_fits_callback_limit() {
        let action = Action::ReplyTo {
            user_id: UserId(i64::MIN),
        };
        assert!(action.encode().len() <= CALLBACK_DATA_LIMIT);
        assert!(Action::ConfirmAdminMessage.encode().len() <= CALLBACK_DATA_LIMIT);
    }

    #[test]
    fn test_decode_rejects_foreign_data() {
        assert_eq!(Action::decode("reply_to_42"), None);
        assert_eq!(Action::decode(r#"{"kind":"launch"}"#), None);
        assert_eq!(Action::decode(""), None);
    }

    #[test]
    fn test_reply_to_keyboard_embeds_target() {
        let Keyboard::Inline { rows } = Keyboard::reply_to(UserId(7)) else {
            panic!("expected inline keyboard");
        };
        assert_eq!(rows[0][0].action, Action::ReplyTo { user_id: UserId(7) });
    }
}
