use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An organizational unit. Scopes request visibility for regular users.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Sector {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
