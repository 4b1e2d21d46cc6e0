use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;

/// Parse an enum value using serde-deserialization. Accepts both `-` and `_`
/// as the word separator.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let trimmed = raw.trim().to_lowercase();
    let candidates = [
        trimmed.clone(),
        trimmed.replace('_', "-"),
        trimmed.replace('-', "_"),
    ];
    let mut last_error = None;
    for candidate in candidates {
        match serde_json::from_value(serde_json::Value::String(candidate)) {
            Ok(value) => return Ok(value),
            Err(error) => last_error = Some(error),
        }
    }
    let detail = last_error.map(|e| e.to_string()).unwrap_or_default();
    Err(anyhow::anyhow!("invalid {field} '{raw}': {detail}"))
}

/// Parse a calendar date (`YYYY-MM-DD`).
pub fn parse_date(raw: &str, field: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Parse a due timestamp: RFC 3339, or a bare date meaning the end of that
/// day (UTC).
pub fn parse_due(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw.trim()) {
        return Ok(ts.with_timezone(&Utc));
    }
    let date = parse_date(raw, "due")?;
    date.and_hms_opt(23, 59, 59)
        .map(|naive| naive.and_utc())
        .ok_or_else(|| anyhow::anyhow!("invalid due '{raw}'"))
}

/// An optional flag for a nullable field: absent leaves the field alone,
/// an empty value clears it.
pub fn nullable(raw: Option<String>) -> Option<Option<String>> {
    raw.map(|value| {
        let value = value.trim().to_string();
        (!value.is_empty()).then_some(value)
    })
}
