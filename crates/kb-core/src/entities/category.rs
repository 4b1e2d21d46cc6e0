use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A free-form classification tag with a display color.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// CSS hex color, e.g. `#3B82F6`.
    pub color: String,
    pub created_at: DateTime<Utc>,
}
