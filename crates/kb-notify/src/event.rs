use std::fmt;

use kb_core::enums::RequestStatus;
use serde::Serialize;

/// What happened to the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyAction {
    Created,
    StatusChanged,
}

impl NotifyAction {
    /// Text shown in the message's action line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "new request created",
            Self::StatusChanged => "status changed",
        }
    }
}

impl fmt::Display for NotifyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of one notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationEvent {
    pub protocol: String,
    pub title: String,
    pub status: RequestStatus,
    /// Display name of whoever triggered the event.
    pub actor: Option<String>,
    pub action: NotifyAction,
}

/// Result of one dispatch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    Delivered,
    /// No credentials configured; nothing was sent.
    Disabled,
    Failed(String),
}

impl NotifyOutcome {
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Delivered => "delivered",
            Self::Disabled => "disabled",
            Self::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for NotifyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(reason) => write!(f, "failed: {reason}"),
            other => f.write_str(other.as_str()),
        }
    }
}
