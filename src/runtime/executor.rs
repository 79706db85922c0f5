//! Event dispatcher
//!
//! Routes inbound events to the stateful session machine or the stateless
//! inline handler, and executes the effects transitions produce. Delivery is
//! the only suspension point; its failures are logged or reported back into
//! the state machine, never propagated.

use super::store::SessionStore;
use super::traits::Transport;
use super::Incoming;
use crate::inline;
use crate::keyboard::Keyboard;
use crate::state_machine::{
    transition, BotContext, ChatId, Effect, Event, RelayLeg, Reply, TransitionError, UserId,
};
use crate::texts;

/// Dispatcher that can work with any transport implementation
pub struct Dispatcher<T: Transport> {
    context: BotContext,
    store: SessionStore,
    transport: T,
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(context: BotContext, transport: T) -> Self {
        Self {
            context,
            store: SessionStore::new(),
            transport,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Handle one inbound event to completion.
    ///
    /// Callers must not run two `handle` calls for the same user at once;
    /// events for different users may interleave freely.
    pub async fn handle(&self, incoming: Incoming) {
        match incoming {
            Incoming::Message {
                chat,
                chat_kind,
                sender,
                text,
            } => {
                let user = sender.id;
                let event = match text {
                    Some(text) => Event::Text {
                        sender,
                        chat_kind,
                        text,
                    },
                    None => Event::NonText { chat_kind },
                };
                self.process_event(user, chat, event).await;
            }

            Incoming::Button {
                callback_id,
                chat,
                sender,
                action,
            } => {
                if let Err(e) = self.transport.answer_button(&callback_id).await {
                    tracing::warn!(error = %e, "Failed to acknowledge button");
                }
                let Some(action) = action else {
                    tracing::warn!(user_id = %sender.id, "Ignoring button with unknown payload");
                    return;
                };
                let user = sender.id;
                self.process_event(user, chat, Event::Button { sender, action })
                    .await;
            }

            Incoming::InlineQuery {
                query_id,
                sender,
                query,
            } => {
                let article = inline::answer_query(&query, &self.context);
                match self
                    .transport
                    .answer_inline_query(&query_id, &article)
                    .await
                {
                    Ok(()) => {
                        tracing::info!(user_id = %sender.id, query = %query, "Inline query answered");
                    }
                    Err(e) => {
                        tracing::error!(user_id = %sender.id, error = %e, "Failed to answer inline query");
                    }
                }
            }

            Incoming::AddedToGroup { chat, title } => {
                tracing::info!(chat_id = %chat, title = ?title, "Added to group");
                let welcome = Reply::new(texts::group_welcome(&self.context.bot_username));
                if let Err(e) = self.transport.send_message(chat, &welcome).await {
                    tracing::error!(chat_id = %chat, error = %e, "Failed to greet group");
                }
            }
        }
    }

    async fn process_event(&self, user: UserId, chat: ChatId, event: Event) {
        // Relay outcomes come back as events for the same session
        let mut events_to_process = vec![event];

        while let Some(current_event) = events_to_process.pop() {
            let state = self.store.get(user).await;

            // Pure state transition
            let result = match transition(&state, &self.context, current_event) {
                Ok(r) => r,
                Err(e) => {
                    self.handle_transition_error(user, chat, &e).await;
                    continue;
                }
            };

            if result.new_state != state {
                tracing::debug!(
                    user_id = %user,
                    from = state.name(),
                    to = result.new_state.name(),
                    "Session transition"
                );
            }

            // Committed before any delivery, so a failed relay still resets
            self.store.set(user, result.new_state).await;

            for effect in result.effects {
                if let Some(generated_event) = self.execute_effect(chat, effect).await {
                    events_to_process.push(generated_event);
                }
            }
        }
    }

    async fn execute_effect(&self, chat: ChatId, effect: Effect) -> Option<Event> {
        match effect {
            Effect::Reply(reply) => {
                if let Err(e) = self.transport.send_message(chat, &reply).await {
                    tracing::error!(chat_id = %chat, error = %e, "Failed to send reply");
                }
                None
            }

            Effect::Relay { to, message, leg } => {
                match self.transport.send_message(to, &message).await {
                    Ok(()) => {
                        log_relay(&leg, to);
                        Some(Event::RelayDelivered { leg })
                    }
                    Err(e) => {
                        tracing::error!(chat_id = %to, error = %e, "Relay delivery failed");
                        Some(Event::RelayFailed {
                            leg,
                            cause: e.to_string(),
                        })
                    }
                }
            }
        }
    }

    async fn handle_transition_error(&self, user: UserId, chat: ChatId, error: &TransitionError) {
        tracing::warn!(user_id = %user, error = %error, "Rejected event");
        if let TransitionError::NothingToConfirm = error {
            let notice = Reply::with_keyboard(texts::NOTHING_TO_CONFIRM, Keyboard::main_menu());
            if let Err(e) = self.transport.send_message(chat, &notice).await {
                tracing::error!(chat_id = %chat, error = %e, "Failed to send reply");
            }
        }
    }
}

fn log_relay(leg: &RelayLeg, to: ChatId) {
    match leg {
        RelayLeg::ToAdmin { from } => {
            tracing::info!(user_id = %from, admin_chat = %to, "Message relayed to administrator");
        }
        RelayLeg::ToUser { user_id, .. } => {
            tracing::info!(user_id = %user_id, "Administrator reply delivered");
        }
    }
}
