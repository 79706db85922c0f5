//! Bot API HTTP client

use super::error::TelegramError;
use super::types::{
    AnswerCallbackQuery, AnswerInlineQuery, ApiResponse, BotCommand, BotCommandScope,
    DeleteWebhook, GetUpdates, SendMessage, SetMyCommands, Update, User, ALLOWED_UPDATES,
};
use crate::config::BotConfig;
use crate::inline::InlineArticle;
use crate::runtime::Transport;
use crate::state_machine::{ChatId, Reply};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Headroom on top of the long-poll timeout before the HTTP request gives up
const REQUEST_TIMEOUT_MARGIN: Duration = Duration::from_secs(10);

/// Telegram Bot API client
pub struct TelegramClient {
    client: Client,
    /// `{api_url}/bot{token}`; never logged
    base_url: String,
    poll_timeout: Duration,
}

impl TelegramClient {
    pub fn new(config: &BotConfig) -> Result<Self, TelegramError> {
        let client = Client::builder()
            .timeout(config.poll_timeout + REQUEST_TIMEOUT_MARGIN)
            .build()
            .map_err(TelegramError::from_reqwest)?;

        Ok(Self {
            client,
            base_url: format!(
                "{}/bot{}",
                config.api_url.trim_end_matches('/'),
                config.bot_token
            ),
            poll_timeout: config.poll_timeout,
        })
    }

    async fn call<P, R>(&self, method: &str, params: &P) -> Result<R, TelegramError>
    where
        P: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}/{method}", self.base_url))
            .json(params)
            .send()
            .await
            .map_err(TelegramError::from_reqwest)?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            TelegramError::network(format!("Failed to read response: {}", e.without_url()))
        })?;

        // The Bot API reports failures in the body, with a matching status
        let parsed: ApiResponse<R> = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) if status.is_success() => {
                return Err(TelegramError::decode(format!(
                    "Failed to parse {method} response: {e}"
                )));
            }
            Err(_) => return Err(TelegramError::from_api(status.as_u16(), &body, None)),
        };

        if parsed.ok {
            return parsed
                .result
                .ok_or_else(|| TelegramError::decode(format!("{method} returned no result")));
        }

        Err(TelegramError::from_api(
            parsed.error_code.unwrap_or_else(|| status.as_u16()),
            parsed.description.as_deref().unwrap_or("no description"),
            parsed.parameters.and_then(|p| p.retry_after),
        ))
    }

    /// The bot's own account; fails fast on a bad token
    pub async fn get_me(&self) -> Result<User, TelegramError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    pub async fn delete_webhook(&self, drop_pending_updates: bool) -> Result<(), TelegramError> {
        let _: bool = self
            .call(
                "deleteWebhook",
                &DeleteWebhook {
                    drop_pending_updates,
                },
            )
            .await?;
        Ok(())
    }

    /// Long-poll for updates after `offset`
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, TelegramError> {
        self.call(
            "getUpdates",
            &GetUpdates {
                offset,
                timeout: self.poll_timeout.as_secs(),
                allowed_updates: ALLOWED_UPDATES,
            },
        )
        .await
    }

    /// Publish the command menu: `/start` and `/admin` in private chats,
    /// nothing in groups
    pub async fn register_commands(&self) -> Result<(), TelegramError> {
        let private = SetMyCommands {
            commands: vec![
                BotCommand {
                    command: "start",
                    description: "🏠 Main menu",
                },
                BotCommand {
                    command: "admin",
                    description: "💬 Write to the administrator",
                },
            ],
            scope: BotCommandScope::AllPrivateChats,
        };
        let groups = SetMyCommands {
            commands: vec![],
            scope: BotCommandScope::AllGroupChats,
        };

        let _: bool = self.call("setMyCommands", &private).await?;
        let _: bool = self.call("setMyCommands", &groups).await?;
        Ok(())
    }
}

#[async_trait]
impl Transport for TelegramClient {
    async fn send_message(&self, chat: ChatId, message: &Reply) -> Result<(), TelegramError> {
        let _: serde_json::Value = self
            .call("sendMessage", &SendMessage::new(chat, message))
            .await?;
        Ok(())
    }

    async fn answer_button(&self, callback_id: &str) -> Result<(), TelegramError> {
        let _: bool = self
            .call(
                "answerCallbackQuery",
                &AnswerCallbackQuery {
                    callback_query_id: callback_id,
                },
            )
            .await?;
        Ok(())
    }

    async fn answer_inline_query(
        &self,
        query_id: &str,
        article: &InlineArticle,
    ) -> Result<(), TelegramError> {
        let _: bool = self
            .call(
                "answerInlineQuery",
                &AnswerInlineQuery::single(query_id, article),
            )
            .await?;
        Ok(())
    }
}
