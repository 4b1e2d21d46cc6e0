use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use kb_core::entities::LogEntry;
use kb_core::enums::LogLevel;
use serde::Serialize;

/// Aggregate counts over the current log buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LogStats {
    pub total: usize,
    pub last_24h: usize,
    pub last_7d: usize,
    pub by_level: BTreeMap<LogLevel, usize>,
    pub by_category: BTreeMap<String, usize>,
    pub errors: usize,
    pub warnings: usize,
}

impl LogStats {
    pub(crate) fn compute<'a>(
        entries: impl IntoIterator<Item = &'a LogEntry>,
        now: DateTime<Utc>,
    ) -> Self {
        let day_ago = now - Duration::hours(24);
        let week_ago = now - Duration::days(7);

        let mut stats = Self::default();
        for entry in entries {
            stats.total += 1;
            if entry.timestamp >= day_ago {
                stats.last_24h += 1;
            }
            if entry.timestamp >= week_ago {
                stats.last_7d += 1;
            }
            *stats.by_level.entry(entry.level).or_default() += 1;
            *stats.by_category.entry(entry.category.clone()).or_default() += 1;
            match entry.level {
                LogLevel::Error => stats.errors += 1,
                LogLevel::Warn => stats.warnings += 1,
                LogLevel::Info | LogLevel::Debug => {}
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(level: LogLevel, category: &str, at: DateTime<Utc>) -> LogEntry {
        LogEntry {
            id: "log-1".into(),
            timestamp: at,
            level,
            category: category.into(),
            message: "m".into(),
            details: None,
            user_id: None,
            user_name: None,
            origin: None,
        }
    }

    #[test]
    fn counts_windows_levels_and_categories() {
        let now = Utc::now();
        let entries = vec![
            entry(LogLevel::Info, "AUTH", now - Duration::hours(1)),
            entry(LogLevel::Warn, "AUTH", now - Duration::days(2)),
            entry(LogLevel::Error, "REQUEST", now - Duration::days(10)),
        ];
        let stats = LogStats::compute(&entries, now);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.last_24h, 1);
        assert_eq!(stats.last_7d, 2);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.warnings, 1);
        assert_eq!(stats.by_category.get("AUTH"), Some(&2));
        assert_eq!(stats.by_level.get(&LogLevel::Info), Some(&1));
        assert_eq!(stats.by_level.get(&LogLevel::Debug), None);
    }

    #[test]
    fn serializes_level_keys_as_strings() {
        let now = Utc::now();
        let stats = LogStats::compute(&[entry(LogLevel::Warn, "NOTIFY", now)], now);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["by_level"]["warn"], 1);
    }
}
