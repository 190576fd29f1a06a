//! Best-effort operator notifications.
//!
//! Every message is written to the log; when a Telegram bot token and chat
//! id are configured it is also delivered there from a spawned task.
//! Delivery is fire-and-forget: a transport failure is logged and never
//! reaches the trading loop.

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::config::Config;

/// Best-effort notification channel (log + optional Telegram).
#[derive(Debug, Clone)]
pub struct Notifier {
    http: reqwest::Client,
    channel: Option<TelegramChannel>,
}

#[derive(Debug, Clone)]
struct TelegramChannel {
    bot_token: String,
    chat_id: String,
}

impl Notifier {
    /// Create a notifier from config.
    ///
    /// Telegram delivery is enabled only when both the bot token and chat
    /// id are present.
    pub fn new(config: &Config) -> Self {
        let channel = match (&config.telegram_bot_token, &config.telegram_chat_id) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramChannel {
                bot_token: bot_token.clone(),
                chat_id: chat_id.clone(),
            }),
            (None, None) => None,
            _ => {
                warn!("telegram config incomplete, notifications are log-only");
                None
            }
        };

        Self {
            http: reqwest::Client::new(),
            channel,
        }
    }

    /// Log-only notifier, used in tests and when Telegram is not configured.
    pub fn log_only() -> Self {
        Self {
            http: reqwest::Client::new(),
            channel: None,
        }
    }

    /// Send a notification. Never fails and never blocks the caller.
    pub fn notify(&self, message: impl Into<String>) {
        let message = message.into();
        info!(target: "notify", "{message}");

        if let Some(channel) = self.channel.clone() {
            let http = self.http.clone();
            tokio::spawn(async move {
                if let Err(e) = send_telegram(&http, &channel, &message).await {
                    warn!(error = %e, "telegram delivery failed");
                }
            });
        }
    }
}

async fn send_telegram(
    http: &reqwest::Client,
    channel: &TelegramChannel,
    message: &str,
) -> Result<(), reqwest::Error> {
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();
    let url = format!(
        "https://api.telegram.org/bot{}/sendMessage",
        channel.bot_token
    );

    http.post(&url)
        .json(&serde_json::json!({
            "chat_id": channel.chat_id,
            "text": format!("[{timestamp}]\n{message}"),
        }))
        .send()
        .await?
        .error_for_status()?;

    Ok(())
}
