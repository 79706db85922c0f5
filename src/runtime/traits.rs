//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the dispatcher with mock implementations.

use crate::inline::InlineArticle;
use crate::state_machine::{ChatId, Reply};
use crate::telegram::TelegramError;
use async_trait::async_trait;
use std::sync::Arc;

/// Outbound side of the messaging platform.
///
/// Every call is a single delivery attempt; retries and timeouts are the
/// implementation's business.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send an HTML message, with its keyboard if any, to a chat
    async fn send_message(&self, chat: ChatId, message: &Reply) -> Result<(), TelegramError>;

    /// Acknowledge a button press so the client stops its spinner
    async fn answer_button(&self, callback_id: &str) -> Result<(), TelegramError>;

    /// Answer an inline query with a single article
    async fn answer_inline_query(
        &self,
        query_id: &str,
        article: &InlineArticle,
    ) -> Result<(), TelegramError>;
}

// ============================================================================
// Arc implementation for shared transports
// ============================================================================

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send_message(&self, chat: ChatId, message: &Reply) -> Result<(), TelegramError> {
        (**self).send_message(chat, message).await
    }

    async fn answer_button(&self, callback_id: &str) -> Result<(), TelegramError> {
        (**self).answer_button(callback_id).await
    }

    async fn answer_inline_query(
        &self,
        query_id: &str,
        article: &InlineArticle,
    ) -> Result<(), TelegramError> {
        (**self).answer_inline_query(query_id, article).await
    }
}
