//! Pure state transition function
//!
//! Given the same state, context and event, [`transition`] always produces
//! the same result and performs no I/O.

use super::event::{Command, Input, MenuButton};
use super::{
    BotContext, ChatId, ChatKind, Effect, Event, PendingAdminMessage, RelayLeg, Reply, Sender,
    SessionState, UserId,
};
use crate::calculator::{compute_wins_needed, parse_matches, parse_rate};
use crate::keyboard::{Action, Keyboard};
use crate::texts;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Confirmation button pressed with no message awaiting confirmation")]
    NothingToConfirm,
    #[error("User {0} is not the administrator and cannot reply to users")]
    NotAdministrator(UserId),
}

pub fn transition(
    state: &SessionState,
    context: &BotContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match event {
        // Group chats only get inline mode
        Event::Text {
            chat_kind: ChatKind::Group,
            ..
        } => Ok(TransitionResult::new(state.clone())),

        Event::Text { sender, text, .. } => Ok(handle_text(state, &sender, &text)),

        Event::NonText {
            chat_kind: ChatKind::Group,
        } => Ok(TransitionResult::new(state.clone())),

        Event::NonText { .. } => Ok(handle_non_text(state)),

        Event::Button { sender, action } => handle_button(state, context, &sender, action),

        Event::RelayDelivered { leg } => {
            let effects = match leg {
                RelayLeg::ToAdmin { .. } => vec![
                    Effect::reply(texts::MESSAGE_SENT),
                    Effect::reply_with(texts::BACK_TO_MENU, Keyboard::main_menu()),
                ],
                RelayLeg::ToUser { user_id, text } => {
                    vec![Effect::reply(texts::reply_sent(user_id, &text))]
                }
            };
            Ok(TransitionResult::new(state.clone()).with_effects(effects))
        }

        Event::RelayFailed { leg, cause } => {
            let effects = match leg {
                RelayLeg::ToAdmin { .. } => vec![
                    Effect::reply(texts::MESSAGE_FAILED),
                    Effect::reply_with(texts::BACK_TO_MENU, Keyboard::main_menu()),
                ],
                RelayLeg::ToUser { user_id, .. } => {
                    vec![Effect::reply(texts::reply_failed(user_id, &cause))]
                }
            };
            Ok(TransitionResult::new(state.clone()).with_effects(effects))
        }
    }
}

fn handle_text(state: &SessionState, sender: &Sender, text: &str) -> TransitionResult {
    match (state, Input::classify(text)) {
        // ============================================================
        // Cancellation takes precedence over everything else
        // ============================================================
        (SessionState::Idle, Input::Cancel) => TransitionResult::new(SessionState::Idle)
            .with_effect(Effect::reply_with(
                texts::NOTHING_TO_CANCEL,
                Keyboard::main_menu(),
            )),

        (_, Input::Cancel) => {
            let notice = if state.is_calculating() {
                texts::CALCULATION_CANCELLED
            } else if state.reply_target().is_some() {
                texts::REPLY_CANCELLED
            } else {
                texts::SENDING_CANCELLED
            };
            TransitionResult::new(SessionState::Idle)
                .with_effect(Effect::reply_with(notice, Keyboard::main_menu()))
        }

        // ============================================================
        // Commands work from any state
        // ============================================================
        (_, Input::Command(Command::Start)) => TransitionResult::new(state.clone())
            .with_effect(Effect::reply_with(texts::WELCOME, Keyboard::main_menu()))
            .with_effect(Effect::reply_with(texts::QUICK_START, Keyboard::quick_start())),

        (_, Input::Command(Command::Help)) => show_help(state),

        (_, Input::Command(Command::Calc)) => begin_calculation(),

        (_, Input::Command(Command::Admin)) => TransitionResult::new(
            SessionState::AwaitingAdminMessage,
        )
        .with_effect(Effect::reply_with(
            texts::ADMIN_INTRO,
            Keyboard::cancel_admin_message(),
        )),

        // ============================================================
        // Idle: main menu buttons only
        // ============================================================
        (SessionState::Idle, Input::Menu(MenuButton::Calculate)) => begin_calculation(),
        (SessionState::Idle, Input::Menu(MenuButton::Help)) => show_help(state),
        (SessionState::Idle, Input::Menu(MenuButton::About)) => show_about(state),
        (SessionState::Idle, Input::Text(_)) => TransitionResult::new(SessionState::Idle)
            .with_effect(Effect::reply_with(texts::NOT_UNDERSTOOD, Keyboard::main_menu())),

        // ============================================================
        // Calculation steps; failed validation keeps the state as is
        // ============================================================
        (SessionState::AwaitingMatches, _) => match parse_matches(text) {
            None => reprompt(state, texts::INVALID_INTEGER),
            Some(matches) if matches <= 0 => reprompt(state, texts::MATCHES_NOT_POSITIVE),
            Some(matches) => TransitionResult::new(SessionState::AwaitingCurrentRate { matches })
                .with_effect(Effect::reply_with(
                    texts::calc_step_current_rate(matches),
                    Keyboard::cancel_calculation(),
                )),
        },

        (SessionState::AwaitingCurrentRate { matches }, _) => match parse_rate(text) {
            None => reprompt(state, texts::INVALID_NUMBER),
            Some(rate) if !(0.0..=100.0).contains(&rate) => {
                reprompt(state, texts::RATE_OUT_OF_RANGE)
            }
            Some(current_rate) => TransitionResult::new(SessionState::AwaitingDesiredRate {
                matches: *matches,
                current_rate,
            })
            .with_effect(Effect::reply_with(
                texts::calc_step_desired_rate(current_rate),
                Keyboard::cancel_calculation(),
            )),
        },

        (
            SessionState::AwaitingDesiredRate {
                matches,
                current_rate,
            },
            _,
        ) => match parse_rate(text) {
            None => reprompt(state, texts::INVALID_NUMBER),
            Some(desired_rate) => finish_calculation(*matches, *current_rate, desired_rate),
        },

        // ============================================================
        // Administrator relay
        // ============================================================
        (SessionState::AwaitingAdminMessage, _) => {
            let message = PendingAdminMessage {
                text: text.to_string(),
                user_id: sender.id,
                username: sender.username.clone(),
                full_name: sender.full_name.clone(),
            };
            TransitionResult::new(SessionState::AwaitingAdminConfirmation { message })
                .with_effect(Effect::reply_with(
                    texts::admin_preview(text),
                    Keyboard::confirm_admin_message(),
                ))
        }

        (SessionState::AwaitingAdminConfirmation { .. }, _) => TransitionResult::new(
            state.clone(),
        )
        .with_effect(Effect::reply_with(
            texts::CONFIRM_REMINDER,
            Keyboard::confirm_admin_message(),
        )),

        (SessionState::AwaitingAdminReply { reply_to }, _) => {
            TransitionResult::new(SessionState::Idle).with_effect(Effect::Relay {
                to: ChatId::from(*reply_to),
                message: Reply::new(texts::admin_reply_to_user(text)),
                leg: RelayLeg::ToUser {
                    user_id: *reply_to,
                    text: text.to_string(),
                },
            })
        }
    }
}

/// Content without text can never answer a prompt: re-ask without changing
/// the state
fn handle_non_text(state: &SessionState) -> TransitionResult {
    match state {
        SessionState::Idle => TransitionResult::new(SessionState::Idle)
            .with_effect(Effect::reply_with(texts::NOT_UNDERSTOOD, Keyboard::main_menu())),
        SessionState::AwaitingMatches => reprompt(state, texts::INVALID_INTEGER),
        SessionState::AwaitingCurrentRate { .. } | SessionState::AwaitingDesiredRate { .. } => {
            reprompt(state, texts::INVALID_NUMBER)
        }
        SessionState::AwaitingAdminMessage => reprompt(state, texts::ADMIN_TEXT_ONLY),
        SessionState::AwaitingAdminConfirmation { .. } => TransitionResult::new(state.clone())
            .with_effect(Effect::reply_with(
                texts::CONFIRM_REMINDER,
                Keyboard::confirm_admin_message(),
            )),
        SessionState::AwaitingAdminReply { .. } => reprompt(state, texts::REPLY_TEXT_ONLY),
    }
}

fn handle_button(
    state: &SessionState,
    context: &BotContext,
    sender: &Sender,
    action: Action,
) -> Result<TransitionResult, TransitionError> {
    match (state, action) {
        (_, Action::StartCalc) => Ok(begin_calculation()),
        (_, Action::ShowHelp) => Ok(show_help(state)),
        (_, Action::About) => Ok(show_about(state)),

        (SessionState::AwaitingAdminConfirmation { message }, Action::ConfirmAdminMessage) => {
            Ok(TransitionResult::new(SessionState::Idle).with_effect(Effect::Relay {
                to: context.admin_chat(),
                message: Reply::with_keyboard(
                    texts::admin_notification(message),
                    Keyboard::reply_to(message.user_id),
                ),
                leg: RelayLeg::ToAdmin {
                    from: message.user_id,
                },
            }))
        }

        (SessionState::AwaitingAdminConfirmation { .. }, Action::RejectAdminMessage) => {
            Ok(TransitionResult::new(SessionState::Idle)
                .with_effect(Effect::reply(texts::SENDING_CANCELLED))
                .with_effect(Effect::reply_with(texts::BACK_TO_MENU, Keyboard::main_menu())))
        }

        (_, Action::ConfirmAdminMessage | Action::RejectAdminMessage) => {
            Err(TransitionError::NothingToConfirm)
        }

        // The target comes from this button's payload only
        (_, Action::ReplyTo { user_id }) => {
            if !context.is_admin(sender.id) {
                return Err(TransitionError::NotAdministrator(sender.id));
            }
            Ok(
                TransitionResult::new(SessionState::AwaitingAdminReply { reply_to: user_id })
                    .with_effect(Effect::reply(texts::reply_mode(user_id))),
            )
        }
    }
}

fn begin_calculation() -> TransitionResult {
    TransitionResult::new(SessionState::AwaitingMatches).with_effect(Effect::reply_with(
        texts::CALC_STEP_MATCHES,
        Keyboard::cancel_calculation(),
    ))
}

fn show_help(state: &SessionState) -> TransitionResult {
    TransitionResult::new(state.clone())
        .with_effect(Effect::reply_with(texts::HELP, Keyboard::main_menu()))
}

fn show_about(state: &SessionState) -> TransitionResult {
    TransitionResult::new(state.clone())
        .with_effect(Effect::reply_with(texts::ABOUT, Keyboard::main_menu()))
}

fn reprompt(state: &SessionState, notice: &str) -> TransitionResult {
    TransitionResult::new(state.clone()).with_effect(Effect::reply(notice))
}

/// Domain errors end the attempt: the user starts over rather than retrying
/// the last step.
fn finish_calculation(matches: i64, current_rate: f64, desired_rate: f64) -> TransitionResult {
    match compute_wins_needed(matches, current_rate, desired_rate) {
        Ok(calc) => TransitionResult::new(SessionState::Idle)
            .with_effect(Effect::reply_with(
                texts::calculation_result(matches, current_rate, desired_rate, &calc),
                Keyboard::main_menu(),
            ))
            .with_effect(Effect::reply_with(texts::WHATS_NEXT, Keyboard::after_result())),
        Err(e) => TransitionResult::new(SessionState::Idle).with_effect(Effect::reply_with(
            texts::calculation_error(&e),
            Keyboard::main_menu(),
        )),
    }
}
