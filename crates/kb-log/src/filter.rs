use chrono::{DateTime, NaiveDate, Utc};
use kb_core::entities::LogEntry;
use kb_core::enums::LogLevel;

/// Criteria for [`crate::SystemLogger::get_logs`]. All set criteria must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    /// Exact level.
    pub level: Option<LogLevel>,
    /// Case-insensitive substring of the category.
    pub category: Option<String>,
    /// Inclusive lower bound, from the start of the day (UTC).
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound, up to `23:59:59` of the day (UTC).
    pub date_to: Option<NaiveDate>,
    /// Case-insensitive substring of the message, category or actor name.
    pub search: Option<String>,
}

impl LogFilter {
    #[must_use]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = Some(level);
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub const fn date_from(mut self, date: NaiveDate) -> Self {
        self.date_from = Some(date);
        self
    }

    #[must_use]
    pub const fn date_to(mut self, date: NaiveDate) -> Self {
        self.date_to = Some(date);
        self
    }

    #[must_use]
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub(crate) fn matches(&self, entry: &LogEntry) -> bool {
        if self.level.is_some_and(|level| entry.level != level) {
            return false;
        }
        if let Some(category) = non_blank(self.category.as_deref()) {
            if !contains_ci(&entry.category, category) {
                return false;
            }
        }
        if let Some(from) = self.date_from.and_then(start_of_day) {
            if entry.timestamp < from {
                return false;
            }
        }
        if let Some(to) = self.date_to.and_then(end_of_day) {
            if entry.timestamp > to {
                return false;
            }
        }
        if let Some(term) = non_blank(self.search.as_deref()) {
            let by_actor = entry
                .user_name
                .as_deref()
                .is_some_and(|name| contains_ci(name, term));
            if !(contains_ci(&entry.message, term) || contains_ci(&entry.category, term) || by_actor)
            {
                return false;
            }
        }
        true
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn start_of_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc())
}

fn end_of_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(23, 59, 59).map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn entry(level: LogLevel, category: &str, message: &str, at: DateTime<Utc>) -> LogEntry {
        LogEntry {
            id: "log-00000001".into(),
            timestamp: at,
            level,
            category: category.into(),
            message: message.into(),
            details: None,
            user_id: None,
            user_name: Some("Maria".into()),
            origin: None,
        }
    }

    fn noon(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn empty_filter_matches_everything() {
        let e = entry(LogLevel::Debug, "SYSTEM", "boot", noon(1));
        assert!(LogFilter::default().matches(&e));
    }

    #[rstest]
    #[case("auth", true)]
    #[case("AUT", true)]
    #[case("admin", false)]
    #[case("  ", true)]
    fn category_is_case_insensitive_substring(#[case] needle: &str, #[case] expected: bool) {
        let e = entry(LogLevel::Info, "AUTH", "Login: admin - Success", noon(1));
        assert_eq!(LogFilter::default().category(needle).matches(&e), expected);
    }

    #[rstest]
    #[case("login", true)]
    #[case("maria", true)]
    #[case("auth", true)]
    #[case("logout", false)]
    fn search_covers_message_category_and_actor(#[case] term: &str, #[case] expected: bool) {
        let e = entry(LogLevel::Info, "AUTH", "Login: admin - Success", noon(1));
        assert_eq!(LogFilter::default().search(term).matches(&e), expected);
    }

    #[test]
    fn date_range_is_inclusive_to_end_of_day() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        let filter = LogFilter::default().date_from(day).date_to(day);

        let last_second = Utc.with_ymd_and_hms(2025, 3, 2, 23, 59, 59).unwrap();
        let first_second = Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap();
        assert!(filter.matches(&entry(LogLevel::Info, "X", "m", last_second)));
        assert!(filter.matches(&entry(LogLevel::Info, "X", "m", first_second)));
        assert!(!filter.matches(&entry(LogLevel::Info, "X", "m", noon(1))));
        assert!(!filter.matches(&entry(LogLevel::Info, "X", "m", noon(3))));
    }

    #[test]
    fn level_is_exact() {
        let filter = LogFilter::default().level(LogLevel::Warn);
        assert!(filter.matches(&entry(LogLevel::Warn, "X", "m", noon(1))));
        assert!(!filter.matches(&entry(LogLevel::Error, "X", "m", noon(1))));
    }
}
