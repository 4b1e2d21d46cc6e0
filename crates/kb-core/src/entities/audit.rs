use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::AuditAction;

/// An append-only audit trail entry recording one change to a request.
///
/// `protocol` is denormalized so the trail of a deleted request stays readable.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuditEntry {
    pub id: String,
    pub request_id: String,
    pub protocol: String,
    /// `None` when the change was made by the system actor.
    pub actor_id: Option<String>,
    pub actor_name: String,
    pub action: AuditAction,
    pub field: Option<String>,
    pub previous_value: Option<String>,
    pub new_value: Option<String>,
    pub detail: Option<String>,
    pub created_at: DateTime<Utc>,
}
