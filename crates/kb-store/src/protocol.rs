//! Human-facing protocol numbers: `YYYY` + six-digit zero-padded sequence.
//!
//! The sequence is global, persisted in the `protocol-counter` collection and
//! never resets at a year boundary, so a protocol is never handed out twice
//! for the lifetime of a store.

use std::sync::Arc;

use chrono::{Datelike, Utc};
use kb_core::ids::format_protocol;
use parking_lot::Mutex;
use serde_json::Value;

use crate::{Collection, RecordStore, StoreError};

/// Issues sequential protocol numbers backed by the record store.
#[derive(Debug, Clone)]
pub struct ProtocolGenerator {
    store: RecordStore,
    lock: Arc<Mutex<()>>,
}

impl ProtocolGenerator {
    #[must_use]
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Next protocol for the current calendar year (UTC).
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the incremented counter cannot be persisted.
    pub fn next_protocol(&self) -> Result<String, StoreError> {
        self.next_protocol_for_year(Utc::now().year())
    }

    /// Next protocol stamped with `year`.
    ///
    /// An unreadable counter is treated as zero. The counter write is not:
    /// failing to persist it would let the sequence repeat.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the incremented counter cannot be persisted.
    pub fn next_protocol_for_year(&self, year: i32) -> Result<String, StoreError> {
        let _guard = self.lock.lock();
        let next = self.current().saturating_add(1);
        self.store.set_value(Collection::ProtocolCounter, &next)?;
        tracing::debug!(year, sequence = next, "protocol issued");
        Ok(format_protocol(year, next))
    }

    /// Last issued sequence number, zero if none has been issued or the
    /// counter cannot be read.
    #[must_use]
    pub fn current(&self) -> u64 {
        match self.store.get_raw(Collection::ProtocolCounter) {
            Ok(None) => 0,
            Ok(Some(raw)) => parse_counter(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "protocol counter is not a number, restarting at 0");
                0
            }),
            Err(e) => {
                tracing::warn!(%e, "protocol counter unreadable, restarting at 0");
                0
            }
        }
    }
}

/// Sequence part of a protocol, the digits after the four-digit year.
pub(crate) fn protocol_sequence(protocol: &str) -> Option<u64> {
    protocol.get(4..)?.parse().ok()
}

/// Counters are stored as a JSON number; older stores kept a numeric string.
fn parse_counter(raw: &Value) -> Option<u64> {
    match raw {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StorageBackend;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn first_protocol_of_empty_store() {
        let generator = ProtocolGenerator::new(RecordStore::in_memory());
        assert_eq!(generator.next_protocol_for_year(2025).unwrap(), "2025000001");
        assert_eq!(generator.next_protocol_for_year(2025).unwrap(), "2025000002");
    }

    #[test]
    fn continues_from_persisted_counter() {
        let store = RecordStore::in_memory();
        store.set_value(Collection::ProtocolCounter, &41u64).unwrap();
        let generator = ProtocolGenerator::new(store);
        assert_eq!(generator.next_protocol_for_year(2025).unwrap(), "2025000042");
    }

    #[test]
    fn sequence_survives_year_boundary() {
        let generator = ProtocolGenerator::new(RecordStore::in_memory());
        assert_eq!(generator.next_protocol_for_year(2025).unwrap(), "2025000001");
        assert_eq!(generator.next_protocol_for_year(2026).unwrap(), "2026000002");
    }

    #[test]
    fn wide_sequence_is_not_truncated() {
        let store = RecordStore::in_memory();
        store
            .set_value(Collection::ProtocolCounter, &999_999u64)
            .unwrap();
        let generator = ProtocolGenerator::new(store);
        assert_eq!(generator.next_protocol_for_year(2025).unwrap(), "20251000000");
    }

    #[test]
    fn string_counter_is_accepted() {
        let store = RecordStore::in_memory();
        store.set_value(Collection::ProtocolCounter, &"9").unwrap();
        let generator = ProtocolGenerator::new(store);
        assert_eq!(generator.current(), 9);
    }

    #[test]
    fn garbage_counter_restarts_at_zero() {
        let store = RecordStore::in_memory();
        store
            .set_value(Collection::ProtocolCounter, &json!({"n": 1}))
            .unwrap();
        let generator = ProtocolGenerator::new(store.clone());
        assert_eq!(generator.next_protocol_for_year(2025).unwrap(), "2025000001");
        assert_eq!(
            store.get_value::<u64>(Collection::ProtocolCounter).unwrap(),
            Some(1)
        );
    }

    #[test]
    fn sequence_is_read_after_the_year() {
        assert_eq!(protocol_sequence("2025000042"), Some(42));
        assert_eq!(protocol_sequence("20251000000"), Some(1_000_000));
        assert_eq!(protocol_sequence("2025"), None);
        assert_eq!(protocol_sequence("legacy-7"), None);
    }

    struct ReadOnlyBackend;

    impl StorageBackend for ReadOnlyBackend {
        fn read(&self, _key: &str) -> Result<Option<Value>, StoreError> {
            Ok(None)
        }
        fn write(&self, _key: &str, _value: &Value) -> Result<(), StoreError> {
            Err(StoreError::InvalidState("read-only".into()))
        }
        fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[test]
    fn counter_write_failure_is_fatal() {
        let generator = ProtocolGenerator::new(RecordStore::new(Arc::new(ReadOnlyBackend)));
        assert!(generator.next_protocol_for_year(2025).is_err());
    }
}
