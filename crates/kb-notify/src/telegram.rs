//! Telegram Bot API `sendMessage` client.

use chrono::Utc;
use futures::FutureExt;
use futures::future::BoxFuture;
use kb_config::NotifyConfig;
use serde::Serialize;

use crate::Notifier;
use crate::error::NotifyError;
use crate::event::{NotificationEvent, NotifyOutcome};
use crate::message::format_message;

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: String,
    parse_mode: &'static str,
}

/// Posts notification messages to a chat through a bot token.
///
/// Inert when the token or chat ID is missing: every call resolves to
/// [`NotifyOutcome::Disabled`] without touching the network.
#[derive(Clone)]
pub struct TelegramNotifier {
    http: reqwest::Client,
    config: NotifyConfig,
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TelegramNotifier {
    /// Build a notifier whose calls time out after `config.timeout_secs`.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::Http` if the HTTP client cannot be built.
    pub fn new(config: NotifyConfig) -> Result<Self, NotifyError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("kb/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Send one message.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::NotConfigured` when credentials are missing,
    /// `NotifyError::Http` on transport failure or timeout, and
    /// `NotifyError::Api` on a non-success response.
    pub async fn send(&self, event: &NotificationEvent) -> Result<(), NotifyError> {
        if !self.config.is_configured() {
            return Err(NotifyError::NotConfigured);
        }
        tracing::debug!(
            protocol = %event.protocol,
            action = %event.action,
            "sending notification"
        );
        let body = SendMessage {
            chat_id: &self.config.chat_id,
            text: format_message(event, Utc::now()),
            parse_mode: "HTML",
        };
        let resp = self
            .http
            .post(self.config.send_message_url())
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(NotifyError::Api {
                status: resp.status().as_u16(),
                message: resp.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }
}

impl Notifier for TelegramNotifier {
    fn notify(&self, event: NotificationEvent) -> BoxFuture<'static, NotifyOutcome> {
        let notifier = self.clone();
        async move {
            match notifier.send(&event).await {
                Ok(()) => NotifyOutcome::Delivered,
                Err(NotifyError::NotConfigured) => NotifyOutcome::Disabled,
                Err(e) => {
                    tracing::warn!(protocol = %event.protocol, %e, "notification failed");
                    NotifyOutcome::Failed(e.to_string())
                }
            }
        }
        .boxed()
    }

    fn is_enabled(&self) -> bool {
        self.is_configured()
    }
}
