//! Request patch and builder.

use chrono::{DateTime, Utc};
use kb_core::enums::{Priority, RequestStatus};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RequestStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

impl RequestUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category_id.is_none()
            && self.sector_id.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_at.is_none()
            && self.notes.is_none()
    }
}

#[derive(Debug, Default)]
pub struct RequestUpdateBuilder(RequestUpdate);

impl RequestUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(RequestUpdate::default())
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.0.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Option<String>) -> Self {
        self.0.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn sector_id(mut self, sector_id: Option<String>) -> Self {
        self.0.sector_id = Some(sector_id);
        self
    }

    #[must_use]
    pub const fn status(mut self, status: RequestStatus) -> Self {
        self.0.status = Some(status);
        self
    }

    #[must_use]
    pub const fn priority(mut self, priority: Priority) -> Self {
        self.0.priority = Some(priority);
        self
    }

    #[must_use]
    pub const fn due_at(mut self, due_at: Option<DateTime<Utc>>) -> Self {
        self.0.due_at = Some(due_at);
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.0.notes = Some(notes);
        self
    }

    #[must_use]
    pub fn build(self) -> RequestUpdate {
        self.0
    }
}
