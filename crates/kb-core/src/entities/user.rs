use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::credential::PasswordHash;
use crate::enums::Role;
use crate::errors::CoreError;

/// Role of a user, carrying the role-specific fields.
///
/// Serialized inline into the user record as `"role": "admin"` or
/// `"role": "user", "sector_id": "..."`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum UserRole {
    /// Sees every request regardless of sector.
    Admin,
    /// Sees only the requests of their own sector.
    #[serde(rename = "user")]
    Regular { sector_id: String },
}

impl UserRole {
    /// Build a regular-user role, rejecting an empty sector.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if `sector_id` is blank.
    pub fn regular(sector_id: impl Into<String>) -> Result<Self, CoreError> {
        let sector_id = sector_id.into();
        if sector_id.trim().is_empty() {
            return Err(CoreError::Validation(
                "regular users must be assigned to a sector".into(),
            ));
        }
        Ok(Self::Regular { sector_id })
    }

    #[must_use]
    pub const fn kind(&self) -> Role {
        match self {
            Self::Admin => Role::Admin,
            Self::Regular { .. } => Role::User,
        }
    }

    #[must_use]
    pub fn sector_id(&self) -> Option<&str> {
        match self {
            Self::Admin => None,
            Self::Regular { sector_id } => Some(sector_id),
        }
    }
}

/// A board user.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct User {
    pub id: String,
    /// Unique login name.
    pub login: String,
    pub display_name: String,
    pub credential: PasswordHash,
    /// Set on creation; cleared by the first successful password change.
    pub must_change_password: bool,
    #[serde(flatten)]
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl User {
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }

    /// Whether this user may see a request filed under `sector_id`.
    #[must_use]
    pub fn can_view_sector(&self, sector_id: Option<&str>) -> bool {
        match &self.role {
            UserRole::Admin => true,
            UserRole::Regular { sector_id: own } => sector_id == Some(own.as_str()),
        }
    }

    /// Re-check invariants on a record that did not go through the
    /// constructors (e.g. one loaded from disk).
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` on a blank login or a regular user
    /// without a sector.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.login.trim().is_empty() {
            return Err(CoreError::Validation("login must not be empty".into()));
        }
        if let UserRole::Regular { sector_id } = &self.role {
            if sector_id.trim().is_empty() {
                return Err(CoreError::Validation(format!(
                    "user '{}' has role=user but no sector",
                    self.login
                )));
            }
        }
        Ok(())
    }
}
