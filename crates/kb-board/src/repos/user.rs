//! User administration.
//!
//! Logged payloads use [`UserSummary`], which never carries the credential.

use chrono::{DateTime, Utc};
use kb_core::actor::Actor;
use kb_core::credential::PasswordHash;
use kb_core::entities::{Sector, User, UserRole};
use kb_core::enums::Role;
use kb_core::ids::{PREFIX_USER, generate_id};
use kb_store::Collection;
use serde::Serialize;
use serde_json::json;

use crate::error::BoardError;
use crate::service::BoardService;
use crate::updates::user::UserUpdate;

/// Input for [`BoardService::create_user`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub login: String,
    pub display_name: String,
    pub password: String,
    pub role: Role,
    /// Required for `Role::User`, dropped for `Role::Admin`.
    pub sector_id: Option<String>,
}

/// A user without the credential, safe to log and print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub login: String,
    pub display_name: String,
    pub role: Role,
    pub sector_id: Option<String>,
    pub must_change_password: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            login: user.login.clone(),
            display_name: user.display_name.clone(),
            role: user.role.kind(),
            sector_id: user.role.sector_id().map(str::to_string),
            must_change_password: user.must_change_password,
            created_at: user.created_at,
        }
    }
}

impl BoardService {
    /// # Errors
    ///
    /// Returns `BoardError::Store` if the collection cannot be read.
    pub fn list_users(&self) -> Result<Vec<User>, BoardError> {
        self.load(Collection::Users, "list users", &Actor::system())
    }

    /// # Errors
    ///
    /// Returns `BoardError::Store` if the collection cannot be read.
    pub fn find_user_by_login(&self, login: &str) -> Result<Option<User>, BoardError> {
        Ok(self.list_users()?.into_iter().find(|u| u.login == login))
    }

    /// Create a user who must change their password at first login.
    ///
    /// # Errors
    ///
    /// Returns `BoardError::Validation` on a blank login or password, a
    /// duplicate login, or a regular user without an existing sector.
    /// Returns `BoardError::Store` if a collection cannot be read or written.
    pub fn create_user(&self, input: NewUser, actor: &Actor) -> Result<User, BoardError> {
        let login = input.login.trim().to_string();
        if login.is_empty() {
            return Err(BoardError::Validation("login is required".into()));
        }
        let mut users: Vec<User> = self.load(Collection::Users, "create user", actor)?;
        if users.iter().any(|u| u.login == login) {
            return Err(BoardError::Validation(format!("login '{login}' is already taken")));
        }
        let role = self.resolve_role(input.role, input.sector_id, actor)?;
        let credential = PasswordHash::hash(&input.password)?;

        let display_name = match input.display_name.trim() {
            "" => login.clone(),
            name => name.to_string(),
        };
        let user = User {
            id: generate_id(PREFIX_USER)?,
            login,
            display_name,
            credential,
            must_change_password: true,
            role,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        self.save(Collection::Users, &users, "create user", actor)?;

        self.logger().log_admin(
            "User created",
            &user.login,
            actor,
            Some(json!({ "after": UserSummary::from(&user) })),
        );
        Ok(user)
    }

    /// Apply a patch. A new password is re-hashed; the forced-change flag is
    /// left as it was.
    ///
    /// # Errors
    ///
    /// Same validation rules as [`Self::create_user`].
    pub fn update_user(
        &self,
        id: &str,
        update: UserUpdate,
        actor: &Actor,
    ) -> Result<Option<User>, BoardError> {
        let mut users: Vec<User> = self.load(Collection::Users, "update user", actor)?;
        let Some(index) = users.iter().position(|u| u.id == id) else {
            self.warn_missing_admin("user", id, "update", actor);
            return Ok(None);
        };

        let current = &users[index];
        let login = match update.login.as_deref().map(str::trim) {
            Some("") => return Err(BoardError::Validation("login is required".into())),
            Some(login) if login != current.login => {
                if users.iter().any(|u| u.login == login) {
                    return Err(BoardError::Validation(format!(
                        "login '{login}' is already taken"
                    )));
                }
                login.to_string()
            }
            _ => current.login.clone(),
        };
        let role = if update.role.is_some() || update.sector_id.is_some() {
            let kind = update.role.unwrap_or_else(|| current.role.kind());
            let sector = update
                .sector_id
                .clone()
                .unwrap_or_else(|| current.role.sector_id().map(str::to_string));
            self.resolve_role(kind, sector, actor)?
        } else {
            current.role.clone()
        };
        let credential = match update.password.as_deref() {
            Some(password) => PasswordHash::hash(password)?,
            None => current.credential.clone(),
        };

        let before = UserSummary::from(current);
        let user = &mut users[index];
        user.login = login;
        if let Some(name) = update.display_name.as_deref().map(str::trim) {
            if !name.is_empty() {
                user.display_name = name.to_string();
            }
        }
        user.role = role;
        user.credential = credential;
        let updated = user.clone();
        self.save(Collection::Users, &users, "update user", actor)?;

        self.logger().log_admin(
            "User updated",
            &updated.login,
            actor,
            Some(json!({
                "before": before,
                "after": UserSummary::from(&updated),
                "fields": update.changed_fields(),
            })),
        );
        Ok(Some(updated))
    }

    /// # Errors
    ///
    /// Returns `BoardError::Store` if the collection cannot be read or written.
    pub fn remove_user(&self, id: &str, actor: &Actor) -> Result<bool, BoardError> {
        let mut users: Vec<User> = self.load(Collection::Users, "remove user", actor)?;
        let Some(index) = users.iter().position(|u| u.id == id) else {
            self.warn_missing_admin("user", id, "remove", actor);
            return Ok(false);
        };
        let removed = users.remove(index);
        self.save(Collection::Users, &users, "remove user", actor)?;

        self.logger().log_admin(
            "User removed",
            &removed.login,
            actor,
            Some(json!({ "before": UserSummary::from(&removed) })),
        );
        Ok(true)
    }

    fn resolve_role(
        &self,
        role: Role,
        sector_id: Option<String>,
        actor: &Actor,
    ) -> Result<UserRole, BoardError> {
        match role {
            Role::Admin => Ok(UserRole::Admin),
            Role::User => {
                let role = UserRole::regular(sector_id.unwrap_or_default())?;
                let wanted = role.sector_id().unwrap_or_default();
                let sectors: Vec<Sector> = self.load(Collection::Sectors, "resolve sector", actor)?;
                if !sectors.iter().any(|s| s.id == wanted) {
                    return Err(BoardError::Validation(format!(
                        "sector '{wanted}' does not exist"
                    )));
                }
                Ok(role)
            }
        }
    }
}
