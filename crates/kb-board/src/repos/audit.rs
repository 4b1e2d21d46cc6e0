//! Audit trail repository.
//!
//! Append-only entries recording every change to a request. There is no
//! update or delete path.

use chrono::Utc;
use kb_core::actor::Actor;
use kb_core::entities::{AuditEntry, Request};
use kb_core::enums::{AuditAction, RequestStatus};
use kb_core::ids::{PREFIX_AUDIT, generate_id};
use kb_store::Collection;
use serde_json::json;

use crate::diff::FieldChange;
use crate::error::BoardError;
use crate::service::BoardService;

/// An audit entry before it receives its ID, actor and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditInput {
    pub request_id: String,
    pub protocol: String,
    pub action: AuditAction,
    pub field: Option<String>,
    pub previous_value: Option<String>,
    pub new_value: Option<String>,
    pub detail: Option<String>,
}

impl AuditInput {
    fn base(request: &Request, action: AuditAction) -> Self {
        Self {
            request_id: request.id.clone(),
            protocol: request.protocol.clone(),
            action,
            field: None,
            previous_value: None,
            new_value: None,
            detail: None,
        }
    }

    #[must_use]
    pub fn creation(request: &Request) -> Self {
        Self {
            detail: Some(format!("Request created: {}", request.title)),
            ..Self::base(request, AuditAction::Creation)
        }
    }

    #[must_use]
    pub fn edit(request: &Request, change: &FieldChange) -> Self {
        Self {
            field: Some(change.field.to_string()),
            previous_value: Some(change.previous.clone()),
            new_value: Some(change.new.clone()),
            ..Self::base(request, AuditAction::Edit)
        }
    }

    #[must_use]
    pub fn status_change(request: &Request, from: RequestStatus, to: RequestStatus) -> Self {
        Self {
            field: Some("status".to_string()),
            previous_value: Some(from.as_str().to_string()),
            new_value: Some(to.as_str().to_string()),
            detail: Some("Status changed via drag".to_string()),
            ..Self::base(request, AuditAction::StatusChange)
        }
    }

    #[must_use]
    pub fn deletion(request: &Request) -> Self {
        Self {
            detail: Some(format!("Request deleted: {}", request.title)),
            ..Self::base(request, AuditAction::Deletion)
        }
    }
}

impl BoardService {
    /// Append one audit entry: read the trail, push, write it back.
    ///
    /// # Errors
    ///
    /// Returns `BoardError::Store` if the trail cannot be read or written.
    /// The failure is logged under `ERROR` first.
    pub fn append_audit(&self, input: AuditInput, actor: &Actor) -> Result<AuditEntry, BoardError> {
        let entry = AuditEntry {
            id: generate_id(PREFIX_AUDIT)?,
            request_id: input.request_id,
            protocol: input.protocol,
            actor_id: actor.user_id.clone(),
            actor_name: actor.name.clone(),
            action: input.action,
            field: input.field,
            previous_value: input.previous_value,
            new_value: input.new_value,
            detail: input.detail,
            created_at: Utc::now(),
        };

        let mut trail: Vec<AuditEntry> = self.load(Collection::AuditLog, "append audit", actor)?;
        trail.push(entry.clone());
        self.save(Collection::AuditLog, &trail, "append audit", actor)?;
        Ok(entry)
    }

    /// Append after the main record is already persisted. A failure here is
    /// logged (by [`Self::append_audit`]) and swallowed so the caller still
    /// sees the committed mutation.
    pub(crate) fn append_audit_best_effort(&self, input: AuditInput, actor: &Actor) {
        let protocol = input.protocol.clone();
        if let Err(e) = self.append_audit(input, actor) {
            tracing::warn!(%protocol, %e, "audit entry lost");
        }
    }

    /// Every audit entry, newest first.
    ///
    /// # Errors
    ///
    /// Returns `BoardError::Store` if the trail cannot be read.
    pub fn list_audit(&self) -> Result<Vec<AuditEntry>, BoardError> {
        self.query_audit(|_| true)
    }

    /// Entries for one request ID, newest first.
    ///
    /// # Errors
    ///
    /// Returns `BoardError::Store` if the trail cannot be read.
    pub fn audit_for_request(&self, request_id: &str) -> Result<Vec<AuditEntry>, BoardError> {
        self.query_audit(|e| e.request_id == request_id)
    }

    /// Entries for one protocol, newest first. Works for deleted requests.
    ///
    /// # Errors
    ///
    /// Returns `BoardError::Store` if the trail cannot be read.
    pub fn audit_for_protocol(&self, protocol: &str) -> Result<Vec<AuditEntry>, BoardError> {
        self.query_audit(|e| e.protocol == protocol)
    }

    fn query_audit(
        &self,
        predicate: impl Fn(&AuditEntry) -> bool,
    ) -> Result<Vec<AuditEntry>, BoardError> {
        let trail: Vec<AuditEntry> = self
            .store()
            .get(Collection::AuditLog)
            .map_err(|e| {
                self.storage_failure("read audit", &Actor::system(), json!({}), e)
            })?;
        let mut entries: Vec<AuditEntry> = trail.into_iter().filter(|e| predicate(e)).collect();
        // Append order breaks ties between entries sharing a timestamp.
        entries.reverse();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }
}
