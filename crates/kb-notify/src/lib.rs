//! # kb-notify
//!
//! Best-effort outbound notifications for request events.
//!
//! Callers hand a [`NotificationEvent`] to a [`Notifier`] and get back a
//! `'static` future resolving to a [`NotifyOutcome`]. Dispatch never fails:
//! transport errors, timeouts and missing credentials all fold into the
//! outcome, so the future can be spawned and forgotten.

pub mod error;
pub mod event;
pub mod message;
pub mod telegram;

use futures::future::BoxFuture;

pub use error::NotifyError;
pub use event::{NotificationEvent, NotifyAction, NotifyOutcome};
pub use telegram::TelegramNotifier;

/// A notification channel.
pub trait Notifier: Send + Sync {
    /// Start one delivery attempt. The returned future owns everything it
    /// needs, so it can be spawned onto a runtime.
    fn notify(&self, event: NotificationEvent) -> BoxFuture<'static, NotifyOutcome>;

    /// Whether a call could reach the channel at all.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Convenience wrapper: `true` only if the message was delivered.
pub async fn notify(notifier: &dyn Notifier, event: NotificationEvent) -> bool {
    notifier.notify(event).await.is_delivered()
}
