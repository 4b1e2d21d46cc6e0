//! Chat-bot notification configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default messaging API base URL.
fn default_api_base() -> String {
    String::from("https://api.telegram.org")
}

/// Default outbound call timeout in seconds.
const fn default_timeout_secs() -> u64 {
    5
}

#[derive(Clone, Deserialize, Serialize)]
pub struct NotifyConfig {
    /// Bot token embedded in the request path (`/bot<token>/sendMessage`).
    #[serde(default)]
    pub bot_token: String,

    /// Target chat ID.
    #[serde(default)]
    pub chat_id: String,

    /// API base URL. Overridable for tests and self-hosted gateways.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Timeout for one outbound call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_id: String::new(),
            api_base: default_api_base(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for NotifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = if self.bot_token.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("NotifyConfig")
            .field("bot_token", &token)
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl NotifyConfig {
    /// Notifications are enabled only when both token and chat ID are set.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.bot_token.is_empty() && !self.chat_id.is_empty()
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Full `sendMessage` endpoint URL.
    #[must_use]
    pub fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_base.trim_end_matches('/'),
            self.bot_token
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = NotifyConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.api_base, "https://api.telegram.org");
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn not_configured_without_chat_id() {
        let config = NotifyConfig {
            bot_token: "123:abc".into(),
            ..Default::default()
        };
        assert!(!config.is_configured());
    }

    #[test]
    fn send_message_url_embeds_token() {
        let config = NotifyConfig {
            bot_token: "123:abc".into(),
            chat_id: "-100".into(),
            api_base: "http://127.0.0.1:9000/".into(),
            timeout_secs: 1,
        };
        assert!(config.is_configured());
        assert_eq!(
            config.send_message_url(),
            "http://127.0.0.1:9000/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn debug_output_hides_token() {
        let config = NotifyConfig {
            bot_token: "123:secret".into(),
            chat_id: "-100".into(),
            ..Default::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("123:secret"));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains("-100"));
    }
}
