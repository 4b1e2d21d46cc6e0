//! Field-level diff of a request patch.

use chrono::{DateTime, SecondsFormat, Utc};
use kb_core::entities::Request;

use crate::updates::request::RequestUpdate;

/// One field whose value actually changed, with stringified values.
///
/// Absent values stringify to `""`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: &'static str,
    pub previous: String,
    pub new: String,
}

/// Apply `update` to `request` in place, returning the changes in field
/// order. Fields set to their current value are not reported. `updated_at`
/// is left to the caller.
pub(crate) fn apply(request: &mut Request, update: &RequestUpdate) -> Vec<FieldChange> {
    let mut changes = Vec::new();

    if let Some(title) = &update.title {
        set(&mut changes, "title", &mut request.title, title.clone(), String::clone);
    }
    if let Some(description) = &update.description {
        set(
            &mut changes,
            "description",
            &mut request.description,
            description.clone(),
            String::clone,
        );
    }
    if let Some(category_id) = &update.category_id {
        set(
            &mut changes,
            "category_id",
            &mut request.category_id,
            category_id.clone(),
            opt_string,
        );
    }
    if let Some(sector_id) = &update.sector_id {
        set(
            &mut changes,
            "sector_id",
            &mut request.sector_id,
            sector_id.clone(),
            opt_string,
        );
    }
    if let Some(status) = update.status {
        set(&mut changes, "status", &mut request.status, status, |s| {
            s.as_str().to_string()
        });
    }
    if let Some(priority) = update.priority {
        set(&mut changes, "priority", &mut request.priority, priority, |p| {
            p.as_str().to_string()
        });
    }
    if let Some(due_at) = update.due_at {
        set(&mut changes, "due_at", &mut request.due_at, due_at, opt_timestamp);
    }
    if let Some(notes) = &update.notes {
        set(&mut changes, "notes", &mut request.notes, notes.clone(), opt_string);
    }

    changes
}

fn set<T: PartialEq>(
    changes: &mut Vec<FieldChange>,
    field: &'static str,
    slot: &mut T,
    value: T,
    render: impl Fn(&T) -> String,
) {
    if *slot == value {
        return;
    }
    changes.push(FieldChange {
        field,
        previous: render(slot),
        new: render(&value),
    });
    *slot = value;
}

fn opt_string(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn opt_timestamp(value: &Option<DateTime<Utc>>) -> String {
    value
        .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}
