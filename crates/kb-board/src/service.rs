//! Service layer orchestrating request mutations with audit, logging and
//! notifications.
//!
//! `BoardService` wraps the `RecordStore` (canonical collections), the shared
//! `SystemLogger` and a `Notifier`. Repository methods live in `impl
//! BoardService` blocks under `repos/`.

use std::sync::Arc;

use futures::FutureExt;
use kb_core::actor::Actor;
use kb_core::audit_detail::NotificationDetail;
use kb_log::{SystemLogger, categories};
use kb_notify::{NotificationEvent, Notifier, NotifyOutcome};
use kb_store::{Collection, ProtocolGenerator, RecordStore, StoreError};
use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::task::JoinHandle;

use crate::error::BoardError;

/// Coordinates every request mutation.
///
/// Each mutation follows the same protocol:
/// 1. Validate input (no side effects on failure)
/// 2. Read the collection, apply the change, write it back
/// 3. Append audit entries
/// 4. Append system log entries
/// 5. Spawn the notification, if any, without waiting for it
pub struct BoardService {
    store: RecordStore,
    logger: Arc<SystemLogger>,
    notifier: Arc<dyn Notifier>,
    protocols: ProtocolGenerator,
    in_flight: Mutex<Vec<JoinHandle<()>>>,
}

impl BoardService {
    #[must_use]
    pub fn new(store: RecordStore, logger: Arc<SystemLogger>, notifier: Arc<dyn Notifier>) -> Self {
        let protocols = ProtocolGenerator::new(store.clone());
        Self {
            store,
            logger,
            notifier,
            protocols,
            in_flight: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub const fn store(&self) -> &RecordStore {
        &self.store
    }

    #[must_use]
    pub const fn logger(&self) -> &Arc<SystemLogger> {
        &self.logger
    }

    #[must_use]
    pub const fn protocols(&self) -> &ProtocolGenerator {
        &self.protocols
    }

    // -----------------------------------------------------------------------
    // Storage with failure logging
    // -----------------------------------------------------------------------

    /// Log a storage failure under `ERROR` and convert it for the caller.
    pub(crate) fn storage_failure(
        &self,
        operation: &str,
        actor: &Actor,
        context: Value,
        error: StoreError,
    ) -> BoardError {
        let details = json!({ "operation": operation, "context": context });
        self.logger
            .log_error(categories::ERROR, &error, Some(details), Some(actor));
        BoardError::Store(error)
    }

    pub(crate) fn load<T: DeserializeOwned>(
        &self,
        collection: Collection,
        operation: &str,
        actor: &Actor,
    ) -> Result<Vec<T>, BoardError> {
        self.store.get(collection).map_err(|e| {
            self.storage_failure(operation, actor, json!({ "collection": collection.key() }), e)
        })
    }

    pub(crate) fn save<T: Serialize>(
        &self,
        collection: Collection,
        items: &[T],
        operation: &str,
        actor: &Actor,
    ) -> Result<(), BoardError> {
        self.store.set(collection, items).map_err(|e| {
            self.storage_failure(operation, actor, json!({ "collection": collection.key() }), e)
        })
    }

    pub(crate) fn next_protocol(&self, actor: &Actor) -> Result<String, BoardError> {
        self.protocols.next_protocol().map_err(|e| {
            self.storage_failure(
                "allocate protocol",
                actor,
                json!({ "collection": Collection::ProtocolCounter.key() }),
                e,
            )
        })
    }

    // -----------------------------------------------------------------------
    // Notifications
    // -----------------------------------------------------------------------

    /// Fire-and-forget delivery. The outcome is logged under `NOTIFY` by the
    /// spawned task; nothing here can fail the calling mutation.
    pub(crate) fn dispatch(&self, event: NotificationEvent) {
        if !self.notifier.is_enabled() {
            log_outcome(&self.logger, &event, &NotifyOutcome::Disabled);
            return;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            self.logger.warn(
                categories::NOTIFY,
                "Notification skipped: no async runtime",
                Some(json!({ "protocol": event.protocol, "action": event.action.as_str() })),
            );
            return;
        };

        let delivery = self.notifier.notify(event.clone());
        let logger = Arc::clone(&self.logger);
        let task = runtime.spawn(async move {
            let outcome = delivery.await;
            log_outcome(&logger, &event, &outcome);
        });

        let mut in_flight = self.in_flight.lock();
        self.reap_finished(&mut in_flight);
        in_flight.push(task);
    }

    /// Wait for every spawned notification. Returns how many were awaited.
    ///
    /// Tasks that panicked or were cancelled are logged under `UNHANDLED_TASK`.
    pub async fn flush_notifications(&self) -> usize {
        let tasks = std::mem::take(&mut *self.in_flight.lock());
        let count = tasks.len();
        for task in tasks {
            if let Err(e) = task.await {
                self.log_task_failure(&e);
            }
        }
        count
    }

    /// Number of notification tasks not yet reaped.
    #[must_use]
    pub fn pending_notifications(&self) -> usize {
        self.in_flight.lock().len()
    }

    fn reap_finished(&self, in_flight: &mut Vec<JoinHandle<()>>) {
        let (finished, running): (Vec<_>, Vec<_>) = std::mem::take(in_flight)
            .into_iter()
            .partition(JoinHandle::is_finished);
        *in_flight = running;
        for task in finished {
            if let Some(Err(e)) = task.now_or_never() {
                self.log_task_failure(&e);
            }
        }
    }

    fn log_task_failure(&self, error: &tokio::task::JoinError) {
        let reason = if error.is_panic() {
            "panicked"
        } else {
            "cancelled"
        };
        self.logger.log_error(
            categories::UNHANDLED_TASK,
            error,
            Some(json!({ "task": "notification", "reason": reason })),
            None,
        );
    }
}

impl std::fmt::Debug for BoardService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardService")
            .field("store", &self.store)
            .field("pending_notifications", &self.pending_notifications())
            .finish_non_exhaustive()
    }
}

fn log_outcome(logger: &SystemLogger, event: &NotificationEvent, outcome: &NotifyOutcome) {
    let detail = NotificationDetail {
        protocol: event.protocol.clone(),
        action: event.action.as_str().to_string(),
        outcome: outcome.as_str().to_string(),
        reason: match outcome {
            NotifyOutcome::Failed(reason) => Some(reason.clone()),
            NotifyOutcome::Delivered | NotifyOutcome::Disabled => None,
        },
    };
    let details = serde_json::to_value(&detail).ok();
    match outcome {
        NotifyOutcome::Delivered => logger.info(categories::NOTIFY, "Notification sent", details),
        NotifyOutcome::Disabled => {
            logger.info(categories::NOTIFY, "Notification disabled", details);
        }
        NotifyOutcome::Failed(_) => logger.warn(categories::NOTIFY, "Notification failed", details),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::request::{EntryPoint, NewRequest};
    use crate::test_support::helpers::{
        RecordingNotifier, admin_actor, service_with, test_service,
    };
    use kb_core::enums::LogLevel;
    use kb_log::LogFilter;
    use kb_notify::NotifyAction;
    use kb_store::StorageBackend;
    use pretty_assertions::assert_eq;

    fn notify_logs(svc: &BoardService) -> Vec<kb_core::entities::LogEntry> {
        svc.logger()
            .get_logs(&LogFilter::default().category(categories::NOTIFY))
    }

    fn create(svc: &BoardService) {
        svc.create_request(
            NewRequest::new("Email setup", "configure account"),
            EntryPoint::Dashboard,
            &admin_actor(),
        )
        .unwrap();
    }

    #[tokio::test]
    async fn delivered_outcome_is_logged_after_flush() {
        let (svc, notifier) = test_service();
        create(&svc);
        assert_eq!(svc.flush_notifications().await, 1);
        assert_eq!(svc.pending_notifications(), 0);

        let events = notifier.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action, NotifyAction::Created);
        assert_eq!(events[0].actor.as_deref(), Some("Administrator"));

        let logs = notify_logs(&svc);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].message, "Notification sent");
        assert_eq!(logs[0].details.as_ref().unwrap()["outcome"], "delivered");
    }

    #[tokio::test]
    async fn failed_outcome_is_a_warning() {
        let notifier = Arc::new(RecordingNotifier::new(NotifyOutcome::Failed(
            "HTTP 502".into(),
        )));
        let svc = service_with(notifier);
        create(&svc);
        svc.flush_notifications().await;

        let logs = notify_logs(&svc);
        assert_eq!(logs[0].level, LogLevel::Warn);
        assert_eq!(logs[0].details.as_ref().unwrap()["reason"], "HTTP 502");
    }

    #[test]
    fn disabled_notifier_logs_without_runtime() {
        let notifier = Arc::new(RecordingNotifier::disabled());
        let svc = service_with(Arc::clone(&notifier));
        create(&svc);

        assert!(notifier.events().is_empty());
        assert_eq!(svc.pending_notifications(), 0);
        let logs = notify_logs(&svc);
        assert_eq!(logs[0].message, "Notification disabled");
        assert_eq!(logs[0].level, LogLevel::Info);
    }

    #[test]
    fn no_runtime_skips_delivery() {
        let (svc, notifier) = test_service();
        create(&svc);
        assert!(notifier.events().is_empty());
        let logs = notify_logs(&svc);
        assert_eq!(logs[0].message, "Notification skipped: no async runtime");
    }

    struct ReadOnly(kb_store::MemoryBackend);

    impl StorageBackend for ReadOnly {
        fn read(&self, key: &str) -> Result<Option<Value>, StoreError> {
            self.0.read(key)
        }

        fn write(&self, key: &str, _value: &Value) -> Result<(), StoreError> {
            if key == Collection::SystemLogs.key() {
                return Ok(());
            }
            Err(StoreError::InvalidState(format!("{key} is read-only")))
        }

        fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::InvalidState("read-only".into()))
        }
    }

    #[test]
    fn storage_failure_is_logged_and_propagated() {
        let store = RecordStore::new(Arc::new(ReadOnly(kb_store::MemoryBackend::default())));
        let logger = Arc::new(SystemLogger::new(store.clone(), 1000));
        let svc = BoardService::new(
            store,
            logger,
            Arc::new(RecordingNotifier::new(NotifyOutcome::Delivered)),
        );

        let err = svc.create_sector("Finance", &admin_actor()).unwrap_err();
        assert!(matches!(err, BoardError::Store(_)));

        let errors = svc
            .logger()
            .get_logs(&LogFilter::default().level(LogLevel::Error));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].category, categories::ERROR);
        let details = errors[0].details.as_ref().unwrap();
        assert_eq!(details["operation"], "create sector");
        assert_eq!(details["context"]["collection"], "sectors");
    }
}
