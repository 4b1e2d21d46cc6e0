//! Session boundary: who is logged in, persisted across processes as a
//! small marker in the `session` collection.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kb_core::actor::Actor;
use kb_core::credential::PasswordHash;
use kb_core::entities::User;
use kb_log::categories;
use kb_store::{Collection, StoreError};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::BoardError;
use crate::service::BoardService;

/// Persisted pointer to the logged-in user. The user record itself is
/// always re-read from the `users` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMarker {
    pub user_id: String,
    pub login: String,
    pub started_at: DateTime<Utc>,
}

pub struct SessionManager {
    board: Arc<BoardService>,
    current: RwLock<Option<User>>,
}

impl SessionManager {
    #[must_use]
    pub fn new(board: Arc<BoardService>) -> Self {
        Self {
            board,
            current: RwLock::new(None),
        }
    }

    /// The logged-in user, if any.
    #[must_use]
    pub fn current(&self) -> Option<User> {
        self.current.read().clone()
    }

    /// The logged-in user as an actor, or the system actor.
    #[must_use]
    pub fn actor(&self) -> Actor {
        self.current
            .read()
            .as_ref()
            .map_or_else(Actor::system, Actor::from)
    }

    /// Resume the session recorded by a previous process.
    ///
    /// A marker pointing at a removed user, or one that cannot be parsed, is
    /// discarded.
    ///
    /// # Errors
    ///
    /// Returns `BoardError::Store` if the users collection cannot be read.
    pub fn restore(&self) -> Result<Option<User>, BoardError> {
        let marker = match self.board.store().get_value::<SessionMarker>(Collection::Session) {
            Ok(Some(marker)) => marker,
            Ok(None) => return Ok(None),
            Err(e @ StoreError::Serde { .. }) => {
                tracing::warn!(%e, "discarding unreadable session marker");
                self.discard_marker();
                return Ok(None);
            }
            Err(e) => {
                return Err(self.board.storage_failure(
                    "restore session",
                    &Actor::system(),
                    json!({ "collection": Collection::Session.key() }),
                    e,
                ));
            }
        };

        let users: Vec<User> = self
            .board
            .load(Collection::Users, "restore session", &Actor::system())?;
        let Some(user) = users.into_iter().find(|u| u.id == marker.user_id) else {
            self.board.logger().log_auth(
                "Session restored",
                &marker.login,
                false,
                Some(json!({ "reason": "user no longer exists" })),
            );
            self.discard_marker();
            return Ok(None);
        };

        self.board.logger().log_auth(
            "Session restored",
            &user.login,
            true,
            Some(json!({ "started_at": marker.started_at })),
        );
        *self.current.write() = Some(user.clone());
        Ok(Some(user))
    }

    /// Check credentials and open a session.
    ///
    /// Returns `Ok(None)` on an unknown login or a wrong password; both are
    /// logged as the same `AUTH` failure.
    ///
    /// # Errors
    ///
    /// Returns `BoardError::Store` if the users collection cannot be read or
    /// the marker cannot be written.
    pub fn login(&self, login: &str, password: &str) -> Result<Option<User>, BoardError> {
        let users: Vec<User> = self
            .board
            .load(Collection::Users, "login", &Actor::system())?;
        let Some(user) = users
            .into_iter()
            .find(|u| u.login == login && u.credential.verify(password))
        else {
            self.board.logger().log_auth("Login", login, false, None);
            return Ok(None);
        };

        self.write_marker(&user)?;
        self.board.logger().log_auth(
            "Login",
            &user.login,
            true,
            Some(json!({
                "role": user.role.kind(),
                "must_change_password": user.must_change_password,
            })),
        );
        *self.current.write() = Some(user.clone());
        Ok(Some(user))
    }

    /// Close the session. Returns whether one was open.
    ///
    /// # Errors
    ///
    /// Returns `BoardError::Store` if the marker cannot be removed.
    pub fn logout(&self) -> Result<bool, BoardError> {
        let Some(user) = self.current.write().take() else {
            return Ok(false);
        };
        self.board.store().clear(Collection::Session).map_err(|e| {
            self.board.storage_failure(
                "logout",
                &Actor::from(&user),
                json!({ "collection": Collection::Session.key() }),
                e,
            )
        })?;
        self.board.logger().log_auth("Logout", &user.login, true, None);
        Ok(true)
    }

    /// Change the logged-in user's password and clear the forced-change
    /// flag. Returns `Ok(false)` without a session or on a wrong current
    /// password.
    ///
    /// # Errors
    ///
    /// Returns `BoardError::Validation` for an empty new password and
    /// `BoardError::Store` if the users collection cannot be written.
    pub fn change_password(&self, current: &str, new: &str) -> Result<bool, BoardError> {
        let Some(user) = self.current() else {
            self.board.logger().warn(
                categories::AUTH,
                "Password change attempted without a session",
                None,
            );
            return Ok(false);
        };
        if new.is_empty() {
            return Err(BoardError::Validation("new password must not be empty".into()));
        }

        let actor = Actor::from(&user);
        let mut users: Vec<User> = self.board.load(Collection::Users, "change password", &actor)?;
        let Some(stored) = users.iter_mut().find(|u| u.id == user.id) else {
            self.board.logger().log_auth(
                "Password change",
                &user.login,
                false,
                Some(json!({ "reason": "user no longer exists" })),
            );
            return Ok(false);
        };
        if !stored.credential.verify(current) {
            self.board
                .logger()
                .log_auth("Password change", &user.login, false, None);
            return Ok(false);
        }

        stored.credential = PasswordHash::hash(new)?;
        stored.must_change_password = false;
        let updated = stored.clone();
        self.board
            .save(Collection::Users, &users, "change password", &actor)?;
        self.write_marker(&updated)?;

        self.board
            .logger()
            .log_auth("Password change", &updated.login, true, None);
        *self.current.write() = Some(updated);
        Ok(true)
    }

    fn write_marker(&self, user: &User) -> Result<(), BoardError> {
        let marker = SessionMarker {
            user_id: user.id.clone(),
            login: user.login.clone(),
            started_at: Utc::now(),
        };
        self.board
            .store()
            .set_value(Collection::Session, &marker)
            .map_err(|e| {
                self.board.storage_failure(
                    "write session",
                    &Actor::from(user),
                    json!({ "collection": Collection::Session.key() }),
                    e,
                )
            })
    }

    fn discard_marker(&self) {
        if let Err(e) = self.board.store().clear(Collection::Session) {
            tracing::warn!(%e, "failed to remove session marker");
        }
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("login", &self.current.read().as_ref().map(|u| u.login.clone()))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::test_service;
    use kb_core::enums::LogLevel;
    use kb_log::LogFilter;
    use pretty_assertions::assert_eq;

    fn seeded() -> Arc<BoardService> {
        let (svc, _) = test_service();
        svc.store().seed_defaults().unwrap();
        Arc::new(svc)
    }

    fn auth_logs(board: &BoardService) -> Vec<kb_core::entities::LogEntry> {
        board
            .logger()
            .get_logs(&LogFilter::default().category(categories::AUTH))
    }

    #[test]
    fn login_success_and_failure_are_logged() {
        let board = seeded();
        let session = SessionManager::new(Arc::clone(&board));

        assert_eq!(session.login("admin", "wrong").unwrap(), None);
        assert_eq!(session.login("ghost", "admin").unwrap(), None);
        let admin = session.login("admin", "admin").unwrap().unwrap();
        assert!(admin.must_change_password);
        assert_eq!(session.actor().name, "Administrator");

        let logs = auth_logs(&board);
        assert_eq!(logs.len(), 3);
        assert_eq!(logs[0].message, "Login: admin - Success");
        assert_eq!(logs[0].level, LogLevel::Info);
        assert_eq!(logs[1].message, "Login: ghost - Failure");
        assert_eq!(logs[1].level, LogLevel::Warn);
        assert_eq!(logs[2].user_name.as_deref(), Some("admin"));
    }

    #[test]
    fn restore_picks_up_marker_from_another_manager() {
        let board = seeded();
        SessionManager::new(Arc::clone(&board))
            .login("admin", "admin")
            .unwrap()
            .unwrap();

        let resumed = SessionManager::new(Arc::clone(&board));
        let user = resumed.restore().unwrap().unwrap();
        assert_eq!(user.login, "admin");
        assert_eq!(resumed.current().unwrap().id, user.id);
        assert_eq!(auth_logs(&board)[0].message, "Session restored: admin - Success");
    }

    #[test]
    fn marker_for_removed_user_is_discarded() {
        let board = seeded();
        let session = SessionManager::new(Arc::clone(&board));
        let admin = session.login("admin", "admin").unwrap().unwrap();
        board.remove_user(&admin.id, &Actor::from(&admin)).unwrap();

        let resumed = SessionManager::new(Arc::clone(&board));
        assert_eq!(resumed.restore().unwrap(), None);
        assert!(!board.store().contains(Collection::Session).unwrap());
    }

    #[test]
    fn change_password_requires_current_and_clears_flag() {
        let board = seeded();
        let session = SessionManager::new(Arc::clone(&board));
        assert!(!session.change_password("admin", "new-pw").unwrap());

        session.login("admin", "admin").unwrap().unwrap();
        assert!(!session.change_password("nope", "new-pw").unwrap());
        assert!(session.change_password("admin", "new-pw").unwrap());
        assert!(!session.current().unwrap().must_change_password);

        session.logout().unwrap();
        assert_eq!(session.login("admin", "admin").unwrap(), None);
        let user = session.login("admin", "new-pw").unwrap().unwrap();
        assert!(!user.must_change_password);
    }

    #[test]
    fn logout_clears_marker() {
        let board = seeded();
        let session = SessionManager::new(Arc::clone(&board));
        assert!(!session.logout().unwrap());
        session.login("admin", "admin").unwrap();
        assert!(session.logout().unwrap());
        assert_eq!(session.current(), None);
        assert_eq!(session.actor(), Actor::system());
        assert_eq!(SessionManager::new(board).restore().unwrap(), None);
    }
}
