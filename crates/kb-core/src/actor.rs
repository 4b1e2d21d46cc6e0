use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::User;

/// Who performed a mutation, as recorded in audit and log entries.
///
/// Anonymous submissions and background work run as [`Actor::system`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Actor {
    /// User ID, `None` for the system actor.
    pub user_id: Option<String>,
    /// Display name shown in the audit trail.
    pub name: String,
}

impl Actor {
    pub const SYSTEM_NAME: &'static str = "System";

    #[must_use]
    pub fn system() -> Self {
        Self {
            user_id: None,
            name: Self::SYSTEM_NAME.to_string(),
        }
    }

    #[must_use]
    pub fn is_system(&self) -> bool {
        self.user_id.is_none()
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            user_id: Some(user.id.clone()),
            name: user.display_name.clone(),
        }
    }
}

impl Default for Actor {
    fn default() -> Self {
        Self::system()
    }
}
