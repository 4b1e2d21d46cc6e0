//! Log export as a pretty JSON array or CSV.

use std::fmt;
use std::str::FromStr;

use chrono::SecondsFormat;
use kb_core::entities::LogEntry;

use crate::error::LogError;

const CSV_HEADER: &str = "Timestamp,Level,Category,Message,User,Details";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown export format '{other}' (expected json or csv)")),
        }
    }
}

pub(crate) fn render(entries: &[LogEntry], format: ExportFormat) -> Result<String, LogError> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(entries)?),
        ExportFormat::Csv => render_csv(entries),
    }
}

fn render_csv(entries: &[LogEntry]) -> Result<String, LogError> {
    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(CSV_HEADER.to_string());
    for entry in entries {
        let details = match &entry.details {
            Some(details) => quote(&serde_json::to_string(details)?),
            None => String::new(),
        };
        let user = entry.user_name.as_deref().map(quote_if_needed).unwrap_or_default();
        lines.push(format!(
            "{},{},{},{},{},{}",
            entry.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            entry.level,
            quote_if_needed(&entry.category),
            quote(&entry.message),
            user,
            details,
        ));
    }
    Ok(lines.join("\n"))
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn quote_if_needed(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        quote(field)
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use kb_core::enums::LogLevel;
    use pretty_assertions::assert_eq;

    fn entry() -> LogEntry {
        LogEntry {
            id: "log-00000001".into(),
            timestamp: Utc.with_ymd_and_hms(2025, 3, 1, 8, 30, 0).unwrap(),
            level: LogLevel::Warn,
            category: "REQUEST".into(),
            message: "Title set to \"Printer\"".into(),
            details: Some(serde_json::json!({"id": "X"})),
            user_id: None,
            user_name: Some("Maria".into()),
            origin: None,
        }
    }

    #[test]
    fn csv_doubles_embedded_quotes() {
        let csv = render(&[entry()], ExportFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(
            lines[1],
            r#"2025-03-01T08:30:00.000Z,warn,REQUEST,"Title set to ""Printer""",Maria,"{""id"":""X""}""#
        );
    }

    #[test]
    fn csv_leaves_missing_fields_empty() {
        let mut e = entry();
        e.details = None;
        e.user_name = None;
        let csv = render(&[e], ExportFormat::Csv).unwrap();
        assert!(csv.lines().nth(1).unwrap().ends_with("\"Title set to \"\"Printer\"\"\",,"));
    }

    #[test]
    fn json_is_pretty_array() {
        let json = render(&[entry()], ExportFormat::Json).unwrap();
        assert!(json.starts_with("[\n"));
        let parsed: Vec<LogEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, vec![entry()]);
    }

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert!("xml".parse::<ExportFormat>().is_err());
    }
}
