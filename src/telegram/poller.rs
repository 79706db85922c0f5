//! Long-polling update loop

use super::client::TelegramClient;
use super::error::TelegramError;
use crate::runtime::{Dispatcher, Transport};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(32);

/// Poll for updates and dispatch them one at a time until `shutdown` fires.
///
/// Polling errors are logged and retried with exponential backoff; they never
/// end the loop.
pub async fn run_polling<T: Transport>(
    client: &TelegramClient,
    dispatcher: &Dispatcher<T>,
    shutdown: CancellationToken,
) {
    let mut offset: Option<i64> = None;
    let mut failures: u32 = 0;

    tracing::info!("Polling for updates");

    loop {
        let batch = tokio::select! {
            () = shutdown.cancelled() => break,
            batch = client.get_updates(offset) => batch,
        };

        let updates = match batch {
            Ok(updates) => {
                failures = 0;
                updates
            }
            Err(e) => {
                failures = failures.saturating_add(1);
                let delay = backoff_delay(failures, &e);
                if e.kind.is_retryable() {
                    tracing::warn!(
                        error = %e,
                        attempt = failures,
                        delay_ms = %delay.as_millis(),
                        "Polling failed"
                    );
                } else {
                    // A revoked token or a competing getUpdates consumer needs an operator
                    tracing::error!(
                        error = %e,
                        kind = ?e.kind,
                        attempt = failures,
                        delay_ms = %delay.as_millis(),
                        "Polling rejected"
                    );
                }
                tokio::select! {
                    () = shutdown.cancelled() => break,
                    () = tokio::time::sleep(delay) => {}
                }
                continue;
            }
        };

        for update in updates {
            offset = Some(update.update_id + 1);
            let update_id = update.update_id;
            match update.into_incoming() {
                Some(incoming) => dispatcher.handle(incoming).await,
                None => tracing::debug!(update_id, "Skipping unsupported update"),
            }
        }
    }

    tracing::info!("Polling stopped");
}

/// Delay before the next poll after `failures` consecutive errors; a
/// server-provided `retry_after` takes precedence and errors that retrying
/// cannot fix wait the maximum
fn backoff_delay(failures: u32, error: &TelegramError) -> Duration {
    if let Some(retry_after) = error.retry_after {
        return retry_after;
    }
    if !error.kind.is_retryable() {
        return MAX_BACKOFF;
    }
    let exponent = failures.saturating_sub(1).min(5);
    (INITIAL_BACKOFF * 2u32.pow(exponent)).min(MAX_BACKOFF)
}
