//! Request repository: create, update, move, delete.

use chrono::{DateTime, Utc};
use kb_core::actor::Actor;
use kb_core::audit_detail::{
    FieldChangedDetail, MissingTargetDetail, RequestCreatedDetail, StatusChangedDetail,
};
use kb_core::entities::Request;
use kb_core::enums::{Priority, RequestStatus};
use kb_core::ids::{PREFIX_REQUEST, generate_id};
use kb_log::categories;
use kb_notify::{NotificationEvent, NotifyAction};
use kb_store::Collection;
use serde::Serialize;

use crate::diff;
use crate::error::BoardError;
use crate::repos::audit::AuditInput;
use crate::service::BoardService;
use crate::updates::request::{RequestUpdate, RequestUpdateBuilder};

/// Where a request was submitted from; decides its starting column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoint {
    /// Authenticated board user. Starts in `pending`.
    Dashboard,
    /// Anonymous public form. Starts in `uncategorized`.
    Public,
}

impl EntryPoint {
    #[must_use]
    pub const fn initial_status(self) -> RequestStatus {
        match self {
            Self::Dashboard => RequestStatus::Pending,
            Self::Public => RequestStatus::Uncategorized,
        }
    }
}

/// Input for [`BoardService::create_request`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewRequest {
    pub title: String,
    pub description: String,
    pub category_id: Option<String>,
    pub sector_id: Option<String>,
    pub priority: Priority,
    pub due_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    /// Explicit starting column; ignored for public submissions.
    pub status: Option<RequestStatus>,
}

impl NewRequest {
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), BoardError> {
        if self.title.trim().is_empty() {
            return Err(BoardError::Validation("title is required".into()));
        }
        if self.description.trim().is_empty() {
            return Err(BoardError::Validation("description is required".into()));
        }
        Ok(())
    }
}

/// A freshly created request and the protocol to show its submitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedRequest {
    pub request: Request,
    pub protocol: String,
}

impl BoardService {
    /// Create a request and announce it.
    ///
    /// # Errors
    ///
    /// Returns `BoardError::Validation` for a blank title or description, and
    /// `BoardError::Store` if the protocol counter or the request collection
    /// cannot be written.
    pub fn create_request(
        &self,
        input: NewRequest,
        entry: EntryPoint,
        actor: &Actor,
    ) -> Result<CreatedRequest, BoardError> {
        input.validate()?;

        let status = match entry {
            EntryPoint::Public => entry.initial_status(),
            EntryPoint::Dashboard => input.status.unwrap_or_else(|| entry.initial_status()),
        };
        let protocol = self.next_protocol(actor)?;
        let now = Utc::now();
        let request = Request {
            id: generate_id(PREFIX_REQUEST)?,
            protocol: protocol.clone(),
            title: input.title.trim().to_string(),
            description: input.description.trim().to_string(),
            category_id: input.category_id.filter(|id| !id.is_empty()),
            sector_id: input.sector_id.filter(|id| !id.is_empty()),
            status,
            priority: input.priority,
            created_by: actor.user_id.clone(),
            created_at: now,
            updated_at: now,
            due_at: input.due_at,
            notes: input.notes.filter(|n| !n.is_empty()),
        };

        let mut requests: Vec<Request> = self.load(Collection::Requests, "create request", actor)?;
        requests.push(request.clone());
        self.save(Collection::Requests, &requests, "create request", actor)?;

        self.append_audit_best_effort(AuditInput::creation(&request), actor);
        let detail = RequestCreatedDetail {
            title: request.title.clone(),
            status: request.status,
            category_id: request.category_id.clone(),
            sector_id: request.sector_id.clone(),
        };
        self.logger().log_request(
            "Request created",
            &protocol,
            actor,
            serde_json::to_value(&detail).ok(),
        );

        self.dispatch(NotificationEvent {
            protocol: protocol.clone(),
            title: request.title.clone(),
            status: request.status,
            actor: notify_actor(actor),
            action: NotifyAction::Created,
        });

        Ok(CreatedRequest { request, protocol })
    }

    /// Look up one request by ID.
    ///
    /// # Errors
    ///
    /// Returns `BoardError::Store` if the collection cannot be read.
    pub fn get_request(&self, id: &str) -> Result<Option<Request>, BoardError> {
        let requests: Vec<Request> = self.load(Collection::Requests, "get request", &Actor::system())?;
        Ok(requests.into_iter().find(|r| r.id == id))
    }

    /// Look up one request by protocol.
    ///
    /// # Errors
    ///
    /// Returns `BoardError::Store` if the collection cannot be read.
    pub fn get_request_by_protocol(&self, protocol: &str) -> Result<Option<Request>, BoardError> {
        let requests: Vec<Request> =
            self.load(Collection::Requests, "get request", &Actor::system())?;
        Ok(requests.into_iter().find(|r| r.protocol == protocol))
    }

    /// Apply a patch. Every field whose value actually changes gets one
    /// `Edit` audit entry and one `REQUEST` log entry; a status change also
    /// sends a notification. `updated_at` is bumped even for an empty patch.
    ///
    /// Returns `Ok(None)` (after a warning) if `id` does not exist.
    ///
    /// # Errors
    ///
    /// Returns `BoardError::Validation` for a blank title or description, and
    /// `BoardError::Store` if the request collection cannot be read or written.
    pub fn update_request(
        &self,
        id: &str,
        update: RequestUpdate,
        actor: &Actor,
    ) -> Result<Option<Request>, BoardError> {
        if update.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(BoardError::Validation("title must not be empty".into()));
        }
        if update
            .description
            .as_deref()
            .is_some_and(|d| d.trim().is_empty())
        {
            return Err(BoardError::Validation("description must not be empty".into()));
        }

        let mut requests: Vec<Request> = self.load(Collection::Requests, "update request", actor)?;
        let Some(current) = requests.iter_mut().find(|r| r.id == id) else {
            self.warn_missing(id, "update", "Attempt to update a missing request", actor);
            return Ok(None);
        };

        let previous_status = current.status;
        let changes = diff::apply(current, &update);
        current.updated_at = Utc::now().max(current.updated_at);
        let updated = current.clone();
        self.save(Collection::Requests, &requests, "update request", actor)?;

        for change in &changes {
            self.append_audit_best_effort(AuditInput::edit(&updated, change), actor);
            let detail = FieldChangedDetail {
                field: change.field.to_string(),
                previous: change.previous.clone(),
                new: change.new.clone(),
            };
            self.logger().log_request(
                &format!("Field {} changed", change.field),
                &updated.protocol,
                actor,
                serde_json::to_value(&detail).ok(),
            );
        }

        if updated.status != previous_status {
            self.dispatch(NotificationEvent {
                protocol: updated.protocol.clone(),
                title: updated.title.clone(),
                status: updated.status,
                actor: notify_actor(actor),
                action: NotifyAction::StatusChanged,
            });
        }

        Ok(Some(updated))
    }

    /// Move a request to another column: an update of `status` alone plus a
    /// dedicated `StatusChange` audit entry and log line. Moving to the
    /// column the request is already in changes nothing.
    ///
    /// Returns `Ok(None)` (after a warning) if `id` does not exist.
    ///
    /// # Errors
    ///
    /// Returns `BoardError::Store` if the request collection cannot be read
    /// or written.
    pub fn move_request(
        &self,
        id: &str,
        status: RequestStatus,
        actor: &Actor,
    ) -> Result<Option<Request>, BoardError> {
        let Some(current) = self
            .load::<Request>(Collection::Requests, "move request", actor)?
            .into_iter()
            .find(|r| r.id == id)
        else {
            self.warn_missing(id, "move", "Attempt to move a missing request", actor);
            return Ok(None);
        };

        if current.status == status {
            self.logger().debug(
                categories::REQUEST,
                format!("Request {} already in {status}", current.protocol),
                None,
            );
            return Ok(Some(current));
        }

        let update = RequestUpdateBuilder::new().status(status).build();
        let Some(moved) = self.update_request(id, update, actor)? else {
            return Ok(None);
        };

        self.append_audit_best_effort(
            AuditInput::status_change(&moved, current.status, status),
            actor,
        );
        let detail = StatusChangedDetail {
            from: current.status,
            to: status,
        };
        self.logger().log_request(
            "Status changed via drag",
            &moved.protocol,
            actor,
            serde_json::to_value(&detail).ok(),
        );

        Ok(Some(moved))
    }

    /// Hard-delete a request. The audit trail keeps a `Deletion` entry.
    ///
    /// Returns `Ok(false)` (after a warning) if `id` does not exist.
    ///
    /// # Errors
    ///
    /// Returns `BoardError::Store` if the request collection cannot be read
    /// or written.
    pub fn delete_request(&self, id: &str, actor: &Actor) -> Result<bool, BoardError> {
        let mut requests: Vec<Request> = self.load(Collection::Requests, "delete request", actor)?;
        let Some(index) = requests.iter().position(|r| r.id == id) else {
            self.warn_missing(id, "delete", "Attempt to delete a missing request", actor);
            return Ok(false);
        };

        let removed = requests.remove(index);
        self.save(Collection::Requests, &requests, "delete request", actor)?;

        self.append_audit_best_effort(AuditInput::deletion(&removed), actor);
        self.logger().log_request(
            "Request deleted",
            &removed.protocol,
            actor,
            Some(serde_json::json!({ "title": removed.title })),
        );
        Ok(true)
    }

    fn warn_missing(&self, id: &str, operation: &str, message: &str, actor: &Actor) {
        let detail = MissingTargetDetail {
            id: id.to_string(),
            operation: operation.to_string(),
        };
        self.logger().log(
            kb_core::enums::LogLevel::Warn,
            categories::REQUEST,
            message,
            serde_json::to_value(&detail).ok(),
            Some(actor),
        );
    }
}

fn notify_actor(actor: &Actor) -> Option<String> {
    (!actor.is_system()).then(|| actor.name.clone())
}
