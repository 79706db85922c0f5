//! Configuration loaded from environment variables

use crate::state_machine::UserId;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_API_URL: &str = "https://api.telegram.org";
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;
/// Telegram caps the `getUpdates` long-poll timeout at 50 seconds
const MAX_POLL_TIMEOUT_SECS: u64 = 50;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Bot configuration
#[derive(Clone)]
pub struct BotConfig {
    pub bot_token: String,
    /// The single administrator allowed to answer relayed messages
    pub admin_id: UserId,
    pub api_url: String,
    /// Long-poll timeout passed to `getUpdates`
    pub poll_timeout: Duration,
}

impl BotConfig {
    /// Load configuration from environment variables.
    ///
    /// - `BOT_TOKEN` - Bot API token (required)
    /// - `ADMIN_ID` - numeric user id of the administrator (required)
    /// - `TELEGRAM_API_URL` - Bot API base URL (default: `https://api.telegram.org`)
    /// - `POLL_TIMEOUT_SECS` - long-poll timeout in seconds, at most 50 (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bot_token = lookup("BOT_TOKEN")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("BOT_TOKEN"))?;

        let admin_id = parse_var(&lookup, "ADMIN_ID")?
            .map(UserId)
            .ok_or(ConfigError::Missing("ADMIN_ID"))?;

        let api_url = lookup("TELEGRAM_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let poll_timeout_secs =
            parse_var(&lookup, "POLL_TIMEOUT_SECS")?.unwrap_or(DEFAULT_POLL_TIMEOUT_SECS);
        if poll_timeout_secs > MAX_POLL_TIMEOUT_SECS {
            return Err(ConfigError::Invalid {
                name: "POLL_TIMEOUT_SECS",
                value: poll_timeout_secs.to_string(),
            });
        }
        let poll_timeout = Duration::from_secs(poll_timeout_secs);

        Ok(Self {
            bot_token,
            admin_id,
            api_url,
            poll_timeout,
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("bot_token", &"<redacted>")
            .field("admin_id", &self.admin_id)
            .field("api_url", &self.api_url)
            .field("poll_timeout", &self.poll_timeout)
            .finish()
    }
}
