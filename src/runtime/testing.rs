//! Mock implementations for testing
//!
//! These mocks enable dispatcher tests without real I/O.

use super::traits::Transport;
use crate::inline::InlineArticle;
use crate::state_machine::{ChatId, Reply};
use crate::telegram::TelegramError;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

/// Transport that records every call and fails deliveries to chosen chats
#[derive(Default)]
pub struct MockTransport {
    /// Chats whose deliveries fail as if the user blocked the bot
    unreachable: Mutex<HashSet<ChatId>>,
    /// Record of all delivered messages
    pub sent: Mutex<Vec<(ChatId, Reply)>>,
    /// Record of acknowledged buttons
    pub answered_buttons: Mutex<Vec<String>>,
    /// Record of inline answers
    pub inline_answers: Mutex<Vec<(String, InlineArticle)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every delivery to `chat` fail
    pub fn with_unreachable(self, chat: ChatId) -> Self {
        self.unreachable.lock().unwrap().insert(chat);
        self
    }

    /// Messages delivered to `chat`, oldest first
    pub fn sent_to(&self, chat: ChatId) -> Vec<Reply> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(to, _)| *to == chat)
            .map(|(_, reply)| reply.clone())
            .collect()
    }

    /// Texts delivered to `chat`, oldest first
    pub fn texts_to(&self, chat: ChatId) -> Vec<String> {
        self.sent_to(chat).into_iter().map(|r| r.text).collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send_message(&self, chat: ChatId, message: &Reply) -> Result<(), TelegramError> {
        if self.unreachable.lock().unwrap().contains(&chat) {
            return Err(TelegramError::forbidden(
                "Forbidden: bot was blocked by the user",
            ));
        }
        self.sent.lock().unwrap().push((chat, message.clone()));
        Ok(())
    }

    async fn answer_button(&self, callback_id: &str) -> Result<(), TelegramError> {
        self.answered_buttons
            .lock()
            .unwrap()
            .push(callback_id.to_string());
        Ok(())
    }

    async fn answer_inline_query(
        &self,
        query_id: &str,
        article: &InlineArticle,
    ) -> Result<(), TelegramError> {
        self.inline_answers
            .lock()
            .unwrap()
            .push((query_id.to_string(), article.clone()));
        Ok(())
    }
}
