//! Telegram error types

use std::time::Duration;
use thiserror::Error;

/// Bot API error with classification
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TelegramError {
    pub kind: TelegramErrorKind,
    pub message: String,
    pub retry_after: Option<Duration>,
}

impl TelegramError {
    pub fn new(kind: TelegramErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            retry_after: None,
        }
    }

    pub fn with_retry_after(mut self, duration: Duration) -> Self {
        self.retry_after = Some(duration);
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(TelegramErrorKind::Network, message)
    }

    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::new(TelegramErrorKind::RateLimit, message)
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(TelegramErrorKind::ServerError, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(TelegramErrorKind::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(TelegramErrorKind::Forbidden, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(TelegramErrorKind::InvalidRequest, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(TelegramErrorKind::Decode, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(TelegramErrorKind::Unknown, message)
    }

    /// Classify a rejection reported by the Bot API (`ok: false`)
    pub fn from_api(code: u16, description: &str, retry_after: Option<u64>) -> Self {
        match code {
            401 => Self::unauthorized(description),
            403 => Self::forbidden(description),
            429 => {
                let err = Self::rate_limit(description);
                match retry_after {
                    Some(secs) => err.with_retry_after(Duration::from_secs(secs)),
                    None => err,
                }
            }
            400 | 404 | 409 => Self::invalid_request(description),
            500..=599 => Self::server_error(description),
            _ => Self::unknown(format!("HTTP {code}: {description}")),
        }
    }

    /// Convert a `reqwest` failure without leaking the request URL, which
    /// embeds the bot token
    pub fn from_reqwest(error: reqwest::Error) -> Self {
        let error = error.without_url();
        if error.is_timeout() {
            Self::network(format!("Request timeout: {error}"))
        } else if error.is_connect() {
            Self::network(format!("Connection failed: {error}"))
        } else if error.is_decode() {
            Self::decode(format!("Failed to read response: {error}"))
        } else {
            Self::unknown(format!("Request failed: {error}"))
        }
    }
}

/// Error classification for retry logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelegramErrorKind {
    /// Network issues, timeouts - retryable
    Network,
    /// Flood control (429) - retryable after `retry_after`
    RateLimit,
    /// Server error (5xx) - retryable
    ServerError,
    /// Bad token (401) - not retryable
    Unauthorized,
    /// Blocked by the user or kicked from the chat (403) - not retryable
    Forbidden,
    /// Bad request (400) - not retryable
    InvalidRequest,
    /// Response body did not match the expected shape
    Decode,
    /// Unknown error
    Unknown,
}

impl TelegramErrorKind {
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Network | Self::RateLimit | Self::ServerError)
    }
}
