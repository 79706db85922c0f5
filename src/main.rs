//! Winrate Bot - a Telegram win-rate calculator with an administrator relay
//!
//! Computes how many consecutive wins move a current win rate to a desired
//! one, stepwise in private chats or in one shot through inline mode, and
//! relays messages between users and a single administrator.

mod calculator;
mod config;
mod inline;
mod keyboard;
mod runtime;
mod state_machine;
mod telegram;
mod texts;

use config::BotConfig;
use runtime::Dispatcher;
use state_machine::BotContext;
use std::sync::Arc;
use telegram::TelegramClient;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "winrate_bot=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = BotConfig::from_env()?;
    tracing::info!(admin_id = %config.admin_id, api_url = %config.api_url, "Configuration loaded");

    let client = Arc::new(TelegramClient::new(&config)?);

    // A bad token ends the process here
    let me = client.get_me().await?;
    let bot_username = me.username.unwrap_or_default();
    tracing::info!(bot_id = me.id, username = %bot_username, "Authorized");

    if let Err(e) = client.register_commands().await {
        tracing::warn!(error = %e, "Failed to register bot commands");
    }
    client.delete_webhook(true).await?;

    let dispatcher = Dispatcher::new(
        BotContext::new(config.admin_id, bot_username),
        Arc::clone(&client),
    );

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                return;
            }
            tracing::info!("Shutdown requested");
            shutdown.cancel();
        }
    });

    telegram::run_polling(&client, &dispatcher, shutdown).await;

    // Sessions are not persisted; anything in flight is dropped here
    let active = dispatcher.store().active_sessions().await;
    tracing::info!(active_sessions = active, "Stopped");

    Ok(())
}
