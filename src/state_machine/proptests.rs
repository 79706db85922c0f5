//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::*;
use crate::keyboard::{Action, BUTTON_CANCEL_ADMIN, BUTTON_CANCEL_CALC};
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

const ADMIN: UserId = UserId(1);

fn test_context() -> BotContext {
    BotContext::new(ADMIN, "winrate_bot")
}

fn sender(id: i64) -> Sender {
    Sender {
        id: UserId(id),
        username: None,
        full_name: "Player".to_string(),
    }
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_user_id() -> impl Strategy<Value = UserId> {
    (1i64..1_000_000).prop_map(UserId)
}

fn arb_pending_message() -> impl Strategy<Value = PendingAdminMessage> {
    (arb_user_id(), "[a-zA-Z ]{1,30}").prop_map(|(user_id, text)| PendingAdminMessage {
        text,
        user_id,
        username: None,
        full_name: "Player".to_string(),
    })
}

fn arb_non_idle_state() -> impl Strategy<Value = SessionState> {
    prop_oneof![
        Just(SessionState::AwaitingMatches),
        (1i64..10_000).prop_map(|matches| SessionState::AwaitingCurrentRate { matches }),
        (1i64..10_000, 0.0f64..100.0).prop_map(|(matches, current_rate)| {
            SessionState::AwaitingDesiredRate {
                matches,
                current_rate,
            }
        }),
        Just(SessionState::AwaitingAdminMessage),
        arb_pending_message()
            .prop_map(|message| SessionState::AwaitingAdminConfirmation { message }),
        arb_user_id().prop_map(|reply_to| SessionState::AwaitingAdminReply { reply_to }),
    ]
}

fn arb_state() -> impl Strategy<Value = SessionState> {
    prop_oneof![Just(SessionState::Idle), arb_non_idle_state()]
}

fn arb_cancel_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("/cancel".to_string()),
        Just("/cancel@winrate_bot".to_string()),
        Just(BUTTON_CANCEL_CALC.to_string()),
        Just(BUTTON_CANCEL_ADMIN.to_string()),
    ]
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]{1,4}",
        "[0-9]{1,2}[.,][0-9]{1,2}",
        "-[0-9]{1,3}",
        "[a-zA-Z ]{0,20}",
        Just("/start".to_string()),
        Just("/help".to_string()),
        Just("/calc".to_string()),
        Just("/admin".to_string()),
        arb_cancel_text(),
    ]
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::StartCalc),
        Just(Action::ShowHelp),
        Just(Action::About),
        Just(Action::ConfirmAdminMessage),
        Just(Action::RejectAdminMessage),
        arb_user_id().prop_map(|user_id| Action::ReplyTo { user_id }),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        4 => (arb_text(), any::<bool>()).prop_map(|(text, private)| Event::Text {
            sender: sender(42),
            chat_kind: if private { ChatKind::Private } else { ChatKind::Group },
            text,
        }),
        1 => (arb_action(), any::<bool>()).prop_map(|(action, from_admin)| Event::Button {
            sender: sender(if from_admin { ADMIN.0 } else { 42 }),
            action,
        }),
        1 => any::<bool>().prop_map(|private| Event::NonText {
            chat_kind: if private { ChatKind::Private } else { ChatKind::Group },
        }),
    ]
}

// ============================================================================
// State Validity Checkers
// ============================================================================

fn is_valid_state(state: &SessionState) -> bool {
    match state {
        SessionState::AwaitingCurrentRate { matches } => *matches > 0,
        SessionState::AwaitingDesiredRate {
            matches,
            current_rate,
        } => *matches > 0 && (0.0..=100.0).contains(current_rate),
        _ => true,
    }
}

fn effects_are_valid(effects: &[Effect], new_state: &SessionState) -> bool {
    // A relay is always the last step of its flow
    let has_relay = effects.iter().any(|e| matches!(e, Effect::Relay { .. }));
    !has_relay || new_state.is_idle()
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    // Invariant 1: Valid state after any sequence of events
    #[test]
    fn prop_transitions_preserve_validity(events in proptest::collection::vec(arb_event(), 0..20)) {
        let mut state = SessionState::Idle;
        let ctx = test_context();

        for event in events {
            match transition(&state, &ctx, event) {
                Ok(result) => {
                    state = result.new_state;
                    prop_assert!(is_valid_state(&state), "Invalid state: {:?}", state);
                    prop_assert!(
                        effects_are_valid(&result.effects, &state),
                        "Invalid effects for state {:?}: {:?}",
                        state,
                        result.effects
                    );
                }
                Err(_) => { /* Stale or unauthorized buttons are OK */ }
            }
        }
    }

    // Invariant 2: Cancel from any non-idle state reaches Idle with nothing pending
    #[test]
    fn prop_cancel_always_resets(state in arb_non_idle_state(), cancel in arb_cancel_text()) {
        let event = Event::Text {
            sender: sender(42),
            chat_kind: ChatKind::Private,
            text: cancel,
        };
        let result = transition(&state, &test_context(), event).unwrap();
        prop_assert_eq!(&result.new_state, &SessionState::Idle);
        prop_assert_eq!(result.new_state.pending_matches(), None);
        prop_assert_eq!(result.new_state.pending_current_rate(), None);
        prop_assert!(result.new_state.pending_admin_message().is_none());
        prop_assert_eq!(result.new_state.reply_target(), None);
        prop_assert_eq!(result.effects.len(), 1);
    }

    // Invariant 3: Non-numeric input while awaiting matches changes nothing
    #[test]
    fn prop_non_numeric_matches_keep_state(text in "[a-zA-Z][a-zA-Z ]{0,20}") {
        let state = SessionState::AwaitingMatches;
        let event = Event::Text {
            sender: sender(42),
            chat_kind: ChatKind::Private,
            text,
        };
        let result = transition(&state, &test_context(), event).unwrap();
        prop_assert_eq!(result.new_state, state);
    }

    // Invariant 4: Validation failures never drop earlier answers
    #[test]
    fn prop_bad_rate_keeps_matches(matches in 1i64..10_000, text in "[a-zA-Z]{1,10}|1[0-9]{3}") {
        let state = SessionState::AwaitingCurrentRate { matches };
        let event = Event::Text {
            sender: sender(42),
            chat_kind: ChatKind::Private,
            text,
        };
        let result = transition(&state, &test_context(), event).unwrap();
        prop_assert_eq!(result.new_state, state);
    }

    // Invariant 5: Accepting a pending message always returns to Idle and
    // relays it to the administrator exactly once
    #[test]
    fn prop_confirm_always_idles(message in arb_pending_message()) {
        let state = SessionState::AwaitingAdminConfirmation { message: message.clone() };
        let event = Event::Button { sender: sender(message.user_id.0), action: Action::ConfirmAdminMessage };
        let result = transition(&state, &test_context(), event).unwrap();
        prop_assert!(result.new_state.is_idle());
        let relays: Vec<_> = result.effects.iter().filter_map(|e| match e {
            Effect::Relay { to, leg, .. } => Some((*to, leg.clone())),
            Effect::Reply(_) => None,
        }).collect();
        prop_assert_eq!(relays, vec![(ChatId(ADMIN.0), RelayLeg::ToAdmin { from: message.user_id })]);
    }

    // Invariant 6: The reply target always comes from the pressed button
    #[test]
    fn prop_reply_target_from_payload(state in arb_state(), target in arb_user_id()) {
        let event = Event::Button {
            sender: sender(ADMIN.0),
            action: Action::ReplyTo { user_id: target },
        };
        let result = transition(&state, &test_context(), event).unwrap();
        prop_assert_eq!(result.new_state.reply_target(), Some(target));
    }

    // Invariant 7: Content without text never changes the state
    #[test]
    fn prop_non_text_keeps_state(state in arb_state(), private in any::<bool>()) {
        let event = Event::NonText {
            chat_kind: if private { ChatKind::Private } else { ChatKind::Group },
        };
        let result = transition(&state, &test_context(), event).unwrap();
        prop_assert_eq!(&result.new_state, &state);
        prop_assert_eq!(result.effects.len(), usize::from(private));
    }

    // Invariant 8: Relay outcomes never change the state
    #[test]
    fn prop_relay_outcome_keeps_state(state in arb_state(), delivered in any::<bool>(), user in arb_user_id()) {
        let leg = RelayLeg::ToUser { user_id: user, text: "hi".to_string() };
        let event = if delivered {
            Event::RelayDelivered { leg }
        } else {
            Event::RelayFailed { leg, cause: "blocked".to_string() }
        };
        let result = transition(&state, &test_context(), event).unwrap();
        prop_assert_eq!(result.new_state, state);
    }
}
