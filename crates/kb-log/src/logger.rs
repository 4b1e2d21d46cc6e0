//! The bounded system log.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use kb_core::actor::Actor;
use kb_core::entities::{LogEntry, LogOrigin};
use kb_core::enums::LogLevel;
use kb_core::ids::{PREFIX_LOG, generate_id};
use kb_store::{Collection, RecordStore};
use parking_lot::Mutex;
use serde_json::{Value, json};

use crate::categories;
use crate::error::LogError;
use crate::export::{self, ExportFormat};
use crate::filter::LogFilter;
use crate::stats::LogStats;

pub const DEFAULT_MAX_ENTRIES: usize = 1000;

const HOOK_LOCK_WAIT: Duration = Duration::from_millis(100);

type Listener = Arc<dyn Fn(&[LogEntry]) + Send + Sync>;

/// Handle returned by [`SystemLogger::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Ring buffer of structured log entries, persisted to the `system-logs`
/// collection after every write and pushed to subscribers.
///
/// Construct once per process and share it behind an `Arc`.
pub struct SystemLogger {
    entries: Mutex<VecDeque<LogEntry>>,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_listener: AtomicU64,
    store: RecordStore,
    max_entries: usize,
    origin: Option<LogOrigin>,
}

impl SystemLogger {
    /// Create a logger, loading the persisted snapshot if one exists.
    ///
    /// A missing or unreadable snapshot starts the buffer empty.
    #[must_use]
    pub fn new(store: RecordStore, max_entries: usize) -> Self {
        let max_entries = max_entries.max(1);
        let mut entries: VecDeque<LogEntry> = match store.get(Collection::SystemLogs) {
            Ok(entries) => entries.into(),
            Err(e) => {
                tracing::error!(%e, "failed to load log snapshot, starting empty");
                VecDeque::new()
            }
        };
        while entries.len() > max_entries {
            entries.pop_front();
        }
        Self {
            entries: Mutex::new(entries),
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(0),
            store,
            max_entries,
            origin: None,
        }
    }

    /// Stamp every new entry with the given origin.
    #[must_use]
    pub fn with_origin(mut self, origin: LogOrigin) -> Self {
        self.origin = Some(origin);
        self
    }

    #[must_use]
    pub const fn max_entries(&self) -> usize {
        self.max_entries
    }

    // -----------------------------------------------------------------------
    // Writing
    // -----------------------------------------------------------------------

    /// Record one entry.
    pub fn log(
        &self,
        level: LogLevel,
        category: &str,
        message: impl Into<String>,
        details: Option<Value>,
        actor: Option<&Actor>,
    ) {
        let entry = self.build_entry(level, category, message.into(), details, actor);
        self.append_entry(entry);
    }

    pub fn info(&self, category: &str, message: impl Into<String>, details: Option<Value>) {
        self.log(LogLevel::Info, category, message, details, None);
    }

    pub fn warn(&self, category: &str, message: impl Into<String>, details: Option<Value>) {
        self.log(LogLevel::Warn, category, message, details, None);
    }

    pub fn error(&self, category: &str, message: impl Into<String>, details: Option<Value>) {
        self.log(LogLevel::Error, category, message, details, None);
    }

    pub fn debug(&self, category: &str, message: impl Into<String>, details: Option<Value>) {
        self.log(LogLevel::Debug, category, message, details, None);
    }

    /// Authentication outcome: info on success, warn on failure.
    pub fn log_auth(&self, action: &str, login: &str, success: bool, details: Option<Value>) {
        let (level, outcome) = if success {
            (LogLevel::Info, "Success")
        } else {
            (LogLevel::Warn, "Failure")
        };
        let actor = Actor {
            user_id: None,
            name: login.to_string(),
        };
        self.log(
            level,
            categories::AUTH,
            format!("{action}: {login} - {outcome}"),
            details,
            Some(&actor),
        );
    }

    pub fn log_request(&self, action: &str, protocol: &str, actor: &Actor, details: Option<Value>) {
        self.log(
            LogLevel::Info,
            categories::REQUEST,
            format!("{action} - Protocol: {protocol}"),
            details,
            Some(actor),
        );
    }

    pub fn log_admin(&self, action: &str, target: &str, actor: &Actor, details: Option<Value>) {
        self.log(
            LogLevel::Info,
            categories::ADMIN,
            format!("{action} - {target}"),
            details,
            Some(actor),
        );
    }

    pub fn log_system(&self, message: impl Into<String>, details: Option<Value>) {
        self.log(LogLevel::Info, categories::SYSTEM, message, details, None);
    }

    /// Error-level entry carrying the error's source chain under `causes`.
    pub fn log_error(
        &self,
        category: &str,
        error: &dyn std::error::Error,
        details: Option<Value>,
        actor: Option<&Actor>,
    ) {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }
        let details = match details {
            Some(Value::Object(mut map)) => {
                map.insert("causes".into(), json!(causes));
                Value::Object(map)
            }
            Some(other) => json!({ "context": other, "causes": causes }),
            None => json!({ "causes": causes }),
        };
        self.log(
            LogLevel::Error,
            category,
            error.to_string(),
            Some(details),
            actor,
        );
    }

    /// Append a fully built entry, evicting the oldest on overflow.
    pub fn append_entry(&self, entry: LogEntry) {
        emit_trace(&entry);
        let snapshot = {
            let mut entries = self.entries.lock();
            entries.push_back(entry);
            while entries.len() > self.max_entries {
                entries.pop_front();
            }
            let snapshot: Vec<LogEntry> = entries.iter().cloned().collect();
            self.persist(&snapshot);
            snapshot
        };
        self.notify_listeners(&snapshot);
    }

    /// Like [`Self::append_entry`] but gives up after a short wait for the
    /// buffer lock. Used from the panic hook, where the panicking thread may
    /// already hold it.
    pub(crate) fn try_append_entry(&self, entry: LogEntry) -> bool {
        emit_trace(&entry);
        let Some(mut entries) = self.entries.try_lock_for(HOOK_LOCK_WAIT) else {
            return false;
        };
        entries.push_back(entry);
        while entries.len() > self.max_entries {
            entries.pop_front();
        }
        let snapshot: Vec<LogEntry> = entries.iter().cloned().collect();
        self.persist(&snapshot);
        drop(entries);
        self.notify_listeners(&snapshot);
        true
    }

    pub(crate) fn build_entry(
        &self,
        level: LogLevel,
        category: &str,
        message: String,
        details: Option<Value>,
        actor: Option<&Actor>,
    ) -> LogEntry {
        let timestamp = Utc::now();
        LogEntry {
            id: new_entry_id(timestamp),
            timestamp,
            level,
            category: category.to_string(),
            message,
            details,
            user_id: actor.and_then(|a| a.user_id.clone()),
            user_name: actor.map(|a| a.name.clone()),
            origin: self.origin.clone(),
        }
    }

    /// Empty the buffer, then record the clear itself.
    pub fn clear_logs(&self) {
        {
            let mut entries = self.entries.lock();
            entries.clear();
            self.persist(&[]);
        }
        self.notify_listeners(&[]);
        self.log_system("Logs cleared", None);
    }

    // -----------------------------------------------------------------------
    // Reading
    // -----------------------------------------------------------------------

    /// Matching entries, most recent first.
    #[must_use]
    pub fn get_logs(&self, filter: &LogFilter) -> Vec<LogEntry> {
        self.entries
            .lock()
            .iter()
            .rev()
            .filter(|entry| filter.matches(entry))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Serialize every entry, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `LogError::Serialize` if an entry's details cannot be encoded.
    pub fn export_logs(&self, format: ExportFormat) -> Result<String, LogError> {
        let snapshot: Vec<LogEntry> = self.entries.lock().iter().cloned().collect();
        export::render(&snapshot, format)
    }

    #[must_use]
    pub fn stats(&self) -> LogStats {
        self.stats_at(Utc::now())
    }

    #[must_use]
    pub fn stats_at(&self, now: DateTime<Utc>) -> LogStats {
        LogStats::compute(self.entries.lock().iter(), now)
    }

    // -----------------------------------------------------------------------
    // Subscribers
    // -----------------------------------------------------------------------

    /// Register a callback invoked with the full buffer (oldest first) after
    /// every write. Callbacks run on the writing thread with no lock held, so
    /// they may log themselves.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&[LogEntry]) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, Arc::new(callback)));
        id
    }

    /// Returns `false` if the subscription was already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    fn notify_listeners(&self, snapshot: &[LogEntry]) {
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(snapshot);
        }
    }

    fn persist(&self, snapshot: &[LogEntry]) {
        if let Err(e) = self.store.set(Collection::SystemLogs, snapshot) {
            tracing::error!(%e, "failed to persist log snapshot");
        }
    }
}

impl std::fmt::Debug for SystemLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemLogger")
            .field("entries", &self.len())
            .field("max_entries", &self.max_entries)
            .finish_non_exhaustive()
    }
}

fn new_entry_id(timestamp: DateTime<Utc>) -> String {
    generate_id(PREFIX_LOG).unwrap_or_else(|_| {
        format!(
            "{PREFIX_LOG}-{:x}",
            timestamp.timestamp_nanos_opt().unwrap_or_default()
        )
    })
}

fn emit_trace(entry: &LogEntry) {
    let category = entry.category.as_str();
    let details = &entry.details;
    match entry.level {
        LogLevel::Error => tracing::error!(category, ?details, "{}", entry.message),
        LogLevel::Warn => tracing::warn!(category, ?details, "{}", entry.message),
        LogLevel::Info => tracing::info!(category, ?details, "{}", entry.message),
        LogLevel::Debug => tracing::debug!(category, ?details, "{}", entry.message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::AtomicUsize;

    fn logger(max: usize) -> SystemLogger {
        SystemLogger::new(RecordStore::in_memory(), max)
    }

    #[test]
    fn get_logs_is_most_recent_first() {
        let logger = logger(10);
        logger.info(categories::SYSTEM, "first", None);
        logger.info(categories::SYSTEM, "second", None);
        let messages: Vec<String> = logger
            .get_logs(&LogFilter::default())
            .into_iter()
            .map(|e| e.message)
            .collect();
        assert_eq!(messages, vec!["second", "first"]);
    }

    #[test]
    fn oldest_entry_evicted_on_overflow() {
        let logger = logger(3);
        for i in 0..4 {
            logger.info(categories::SYSTEM, format!("entry {i}"), None);
        }
        let logs = logger.get_logs(&LogFilter::default());
        assert_eq!(logs.len(), 3);
        assert!(logs.iter().all(|e| e.message != "entry 0"));
    }

    #[test]
    fn log_auth_levels_follow_outcome() {
        let logger = logger(10);
        logger.log_auth("Login", "admin", true, None);
        logger.log_auth("Login", "admin", false, None);
        let logs = logger.get_logs(&LogFilter::default());
        assert_eq!(logs[0].level, LogLevel::Warn);
        assert_eq!(logs[0].message, "Login: admin - Failure");
        assert_eq!(logs[1].level, LogLevel::Info);
        assert_eq!(logs[1].user_name.as_deref(), Some("admin"));
    }

    #[test]
    fn log_error_records_cause_chain() {
        #[derive(Debug, thiserror::Error)]
        #[error("outer failure")]
        struct Outer(#[source] std::io::Error);

        let logger = logger(10);
        let err = Outer(std::io::Error::other("disk full"));
        logger.log_error(categories::ERROR, &err, Some(json!({"op": "save"})), None);

        let entry = &logger.get_logs(&LogFilter::default())[0];
        assert_eq!(entry.level, LogLevel::Error);
        assert_eq!(entry.message, "outer failure");
        let details = entry.details.as_ref().unwrap();
        assert_eq!(details["op"], "save");
        assert_eq!(details["causes"][0], "disk full");
    }

    #[test]
    fn clear_leaves_single_system_entry() {
        let logger = logger(10);
        logger.warn(categories::REQUEST, "one", None);
        logger.warn(categories::REQUEST, "two", None);
        logger.clear_logs();

        let logs = logger.get_logs(&LogFilter::default());
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].category, categories::SYSTEM);
        assert_eq!(logs[0].message, "Logs cleared");
    }

    #[test]
    fn subscribers_see_full_buffer_and_can_unsubscribe() {
        let logger = logger(10);
        let seen = Arc::new(AtomicUsize::new(0));
        let other = Arc::new(AtomicUsize::new(0));

        let seen_in = Arc::clone(&seen);
        let id = logger.subscribe(move |entries| seen_in.store(entries.len(), Ordering::SeqCst));
        let other_in = Arc::clone(&other);
        logger.subscribe(move |_| {
            other_in.fetch_add(1, Ordering::SeqCst);
        });

        logger.info(categories::SYSTEM, "a", None);
        logger.info(categories::SYSTEM, "b", None);
        assert_eq!(seen.load(Ordering::SeqCst), 2);

        assert!(logger.unsubscribe(id));
        assert!(!logger.unsubscribe(id));
        logger.info(categories::SYSTEM, "c", None);
        assert_eq!(seen.load(Ordering::SeqCst), 2);
        assert_eq!(other.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn subscriber_may_log_without_deadlock() {
        let logger = Arc::new(logger(10));
        let inner = Arc::clone(&logger);
        logger.subscribe(move |entries| {
            if entries.last().is_some_and(|e| e.category == categories::REQUEST) {
                inner.debug(categories::SYSTEM, "observed", None);
            }
        });
        logger.info(categories::REQUEST, "created", None);
        assert_eq!(logger.len(), 2);
    }

    #[test]
    fn origin_is_stamped() {
        let logger = logger(10).with_origin(LogOrigin {
            ip: Some("localhost".into()),
            agent: Some("kb/0.1.0".into()),
        });
        logger.info(categories::SYSTEM, "boot", None);
        let entry = &logger.get_logs(&LogFilter::default())[0];
        assert_eq!(
            entry.origin.as_ref().and_then(|o| o.agent.as_deref()),
            Some("kb/0.1.0")
        );
    }
}
