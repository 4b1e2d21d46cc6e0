use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Priority, RequestStatus};

/// A tracked request ("ticket") moving through the board columns.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Request {
    pub id: String,
    /// Unique human-facing ticket number, e.g. `2025000042`.
    pub protocol: String,
    pub title: String,
    pub description: String,
    pub category_id: Option<String>,
    pub sector_id: Option<String>,
    pub status: RequestStatus,
    pub priority: Priority,
    /// User ID of the creator, `None` for anonymous submissions.
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub due_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl Request {
    /// A request is overdue when its due time has passed and it is not completed.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status != RequestStatus::Completed && self.due_at.is_some_and(|due| due < now)
    }
}
