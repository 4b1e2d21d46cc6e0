//! Notification error types.

use thiserror::Error;

/// Errors from one outbound notification call.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Token or chat ID missing; notifications are disabled.
    #[error("notifications are not configured")]
    NotConfigured,

    /// HTTP transport error, including timeouts. The request URL is stripped
    /// because it embeds the bot token.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// The messaging API returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the API.
        status: u16,
        /// Response body.
        message: String,
    },
}

impl From<reqwest::Error> for NotifyError {
    fn from(error: reqwest::Error) -> Self {
        Self::Http(error.without_url())
    }
}
