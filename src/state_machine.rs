//! Per-user conversation state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions. The
//! only I/O a transition can ask for is expressed as an [`Effect`].

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::{Effect, Reply};
pub use event::{ChatKind, Event, RelayLeg, Sender};
pub use state::{BotContext, ChatId, PendingAdminMessage, SessionState, UserId};
pub use transition::{transition, TransitionError, TransitionResult};
