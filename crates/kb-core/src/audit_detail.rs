//! Typed detail payloads.
//!
//! System log entries carry a free-form `details` JSON blob. These types give
//! the shapes written by the lifecycle manager a schema, so readers and tests
//! can deserialize them back.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::RequestStatus;

/// Detail for a request creation log entry.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RequestCreatedDetail {
    pub title: String,
    pub status: RequestStatus,
    pub category_id: Option<String>,
    pub sector_id: Option<String>,
}

/// Detail for a single field edit.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FieldChangedDetail {
    pub field: String,
    pub previous: String,
    pub new: String,
}

/// Detail for a status move.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusChangedDetail {
    pub from: RequestStatus,
    pub to: RequestStatus,
}

/// Detail for a mutation that targeted an ID that does not exist.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MissingTargetDetail {
    pub id: String,
    pub operation: String,
}

/// Detail for a notification outcome.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NotificationDetail {
    pub protocol: String,
    pub action: String,
    pub outcome: String,
    pub reason: Option<String>,
}
