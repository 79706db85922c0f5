//! Session state types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a user on the messaging platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a chat (private chat ids equal the user id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

impl From<UserId> for ChatId {
    fn from(user: UserId) -> Self {
        ChatId(user.0)
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A message waiting for the user's confirmation before it goes to the administrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAdminMessage {
    pub text: String,
    pub user_id: UserId,
    pub username: Option<String>,
    pub full_name: String,
}

/// Per-user conversation state.
///
/// Values collected by earlier steps travel inside the variants, so `Idle`
/// carries nothing and a step can never read a field a later step sets.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    /// No flow in progress
    #[default]
    Idle,

    /// Calculation step 1: waiting for the number of matches
    AwaitingMatches,

    /// Calculation step 2: waiting for the current win rate
    AwaitingCurrentRate { matches: i64 },

    /// Calculation step 3: waiting for the desired win rate
    AwaitingDesiredRate { matches: i64, current_rate: f64 },

    /// Waiting for the text to send to the administrator
    AwaitingAdminMessage,

    /// Message captured, waiting for accept/reject
    AwaitingAdminConfirmation { message: PendingAdminMessage },

    /// Administrator only: the next text goes to `reply_to`
    AwaitingAdminReply { reply_to: UserId },
}

impl SessionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, SessionState::Idle)
    }

    /// Check if a winrate calculation is in progress
    pub fn is_calculating(&self) -> bool {
        matches!(
            self,
            SessionState::AwaitingMatches
                | SessionState::AwaitingCurrentRate { .. }
                | SessionState::AwaitingDesiredRate { .. }
        )
    }

    #[allow(dead_code)] // Used by tests
    pub fn pending_matches(&self) -> Option<i64> {
        match self {
            SessionState::AwaitingCurrentRate { matches }
            | SessionState::AwaitingDesiredRate { matches, .. } => Some(*matches),
            _ => None,
        }
    }

    #[allow(dead_code)] // Used by tests
    pub fn pending_current_rate(&self) -> Option<f64> {
        match self {
            SessionState::AwaitingDesiredRate { current_rate, .. } => Some(*current_rate),
            _ => None,
        }
    }

    #[allow(dead_code)] // Used by tests
    pub fn pending_admin_message(&self) -> Option<&PendingAdminMessage> {
        match self {
            SessionState::AwaitingAdminConfirmation { message } => Some(message),
            _ => None,
        }
    }

    pub fn reply_target(&self) -> Option<UserId> {
        match self {
            SessionState::AwaitingAdminReply { reply_to } => Some(*reply_to),
            _ => None,
        }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::AwaitingMatches => "awaiting_matches",
            SessionState::AwaitingCurrentRate { .. } => "awaiting_current_rate",
            SessionState::AwaitingDesiredRate { .. } => "awaiting_desired_rate",
            SessionState::AwaitingAdminMessage => "awaiting_admin_message",
            SessionState::AwaitingAdminConfirmation { .. } => "awaiting_admin_confirmation",
            SessionState::AwaitingAdminReply { .. } => "awaiting_admin_reply",
        }
    }
}

/// Immutable configuration shared by every transition
#[derive(Debug, Clone)]
pub struct BotContext {
    /// The single administrator receiving relayed messages
    pub admin_id: UserId,
    /// Bot username without the leading `@`, used in usage hints
    pub bot_username: String,
}

impl BotContext {
    pub fn new(admin_id: UserId, bot_username: impl Into<String>) -> Self {
        Self {
            admin_id,
            bot_username: bot_username.into(),
        }
    }

    pub fn admin_chat(&self) -> ChatId {
        ChatId::from(self.admin_id)
    }

    pub fn is_admin(&self, user: UserId) -> bool {
        user == self.admin_id
    }
}
