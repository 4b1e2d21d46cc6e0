//! User patch and builder.
//!
//! The password travels in plaintext only as far as the repository, which
//! hashes it; it is never serialized.

use kb_core::enums::Role;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip)]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector_id: Option<Option<String>>,
}

impl UserUpdate {
    /// Names of the fields this patch sets, password included.
    #[must_use]
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.login.is_some() {
            fields.push("login");
        }
        if self.display_name.is_some() {
            fields.push("display_name");
        }
        if self.password.is_some() {
            fields.push("password");
        }
        if self.role.is_some() {
            fields.push("role");
        }
        if self.sector_id.is_some() {
            fields.push("sector_id");
        }
        fields
    }
}

#[derive(Debug, Default)]
pub struct UserUpdateBuilder(UserUpdate);

impl UserUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(UserUpdate::default())
    }

    #[must_use]
    pub fn login(mut self, login: impl Into<String>) -> Self {
        self.0.login = Some(login.into());
        self
    }

    #[must_use]
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.0.display_name = Some(display_name.into());
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.0.password = Some(password.into());
        self
    }

    #[must_use]
    pub const fn role(mut self, role: Role) -> Self {
        self.0.role = Some(role);
        self
    }

    #[must_use]
    pub fn sector_id(mut self, sector_id: Option<String>) -> Self {
        self.0.sector_id = Some(sector_id);
        self
    }

    #[must_use]
    pub fn build(self) -> UserUpdate {
        self.0
    }
}
