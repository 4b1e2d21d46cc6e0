use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::LogLevel;

/// Where a log entry originated.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LogOrigin {
    pub ip: Option<String>,
    pub agent: Option<String>,
}

/// A structured system log entry held in the bounded log buffer.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    /// Free-form tag such as `AUTH`, `REQUEST`, `ADMIN`, `SYSTEM`, `NOTIFY`.
    pub category: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub origin: Option<LogOrigin>,
}
