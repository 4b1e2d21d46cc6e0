//! Read-side projections: requests with resolved names, board columns and
//! counters.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use kb_core::entities::{Category, Request, Sector, User};
use kb_core::enums::{Priority, RequestStatus};
use serde::Serialize;

pub const NO_CATEGORY: &str = "No category";
pub const NO_SECTOR: &str = "No sector";

/// A request with its category and sector resolved to display names.
///
/// A reference to a removed category or sector resolves like an absent one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestView {
    #[serde(flatten)]
    pub request: Request,
    pub category_name: String,
    pub category_color: Option<String>,
    pub sector_name: String,
    pub overdue: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub status: RequestStatus,
    pub label: String,
    pub requests: Vec<RequestView>,
}

/// The four status columns in board order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    pub columns: Vec<Column>,
}

impl Board {
    #[must_use]
    pub fn column(&self, status: RequestStatus) -> Option<&Column> {
        self.columns.iter().find(|c| c.status == status)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.columns.iter().map(|c| c.requests.len()).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoardStats {
    pub total: usize,
    /// Keyed by wire spelling; every status is present.
    pub by_status: BTreeMap<String, usize>,
    /// Keyed by wire spelling; every priority is present.
    pub by_priority: BTreeMap<String, usize>,
    pub overdue: usize,
}

/// Category and sector lookup tables for one read.
pub(crate) struct Catalog {
    categories: HashMap<String, Category>,
    sectors: HashMap<String, Sector>,
}

impl Catalog {
    pub(crate) fn new(categories: Vec<Category>, sectors: Vec<Sector>) -> Self {
        Self {
            categories: categories.into_iter().map(|c| (c.id.clone(), c)).collect(),
            sectors: sectors.into_iter().map(|s| (s.id.clone(), s)).collect(),
        }
    }

    fn category(&self, request: &Request) -> Option<&Category> {
        request
            .category_id
            .as_deref()
            .and_then(|id| self.categories.get(id))
    }

    fn sector(&self, request: &Request) -> Option<&Sector> {
        request
            .sector_id
            .as_deref()
            .and_then(|id| self.sectors.get(id))
    }

    pub(crate) fn resolve(&self, request: Request, now: DateTime<Utc>) -> RequestView {
        let category = self.category(&request);
        let category_name = category.map_or_else(|| NO_CATEGORY.to_string(), |c| c.name.clone());
        let category_color = category.map(|c| c.color.clone());
        let sector_name = self
            .sector(&request)
            .map_or_else(|| NO_SECTOR.to_string(), |s| s.name.clone());
        let overdue = request.is_overdue(now);
        RequestView {
            request,
            category_name,
            category_color,
            sector_name,
            overdue,
        }
    }

    /// Case-insensitive match on title, description, protocol, category
    /// name and sector name. A blank term matches everything.
    pub(crate) fn matches(&self, request: &Request, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        let hit = |text: &str| text.to_lowercase().contains(&term);
        hit(&request.title)
            || hit(&request.description)
            || hit(&request.protocol)
            || self.category(request).is_some_and(|c| hit(&c.name))
            || self.sector(request).is_some_and(|s| hit(&s.name))
    }
}

/// Whether `viewer` may see `request`. Admins see everything; regular users
/// only requests filed under their own sector.
#[must_use]
pub fn is_visible(viewer: &User, request: &Request) -> bool {
    viewer.can_view_sector(request.sector_id.as_deref())
}

pub(crate) fn group(views: Vec<RequestView>) -> Board {
    let mut columns: Vec<Column> = RequestStatus::ALL
        .iter()
        .map(|&status| Column {
            status,
            label: status.label(),
            requests: Vec::new(),
        })
        .collect();
    for view in views {
        if let Some(column) = columns.iter_mut().find(|c| c.status == view.request.status) {
            column.requests.push(view);
        }
    }
    Board { columns }
}

pub(crate) fn count(requests: &[Request], now: DateTime<Utc>) -> BoardStats {
    let mut stats = BoardStats {
        total: requests.len(),
        by_status: RequestStatus::ALL
            .iter()
            .map(|s| (s.as_str().to_string(), 0))
            .collect(),
        by_priority: Priority::ALL
            .iter()
            .map(|p| (p.as_str().to_string(), 0))
            .collect(),
        overdue: 0,
    };
    for request in requests {
        *stats
            .by_status
            .entry(request.status.as_str().to_string())
            .or_default() += 1;
        *stats
            .by_priority
            .entry(request.priority.as_str().to_string())
            .or_default() += 1;
        if request.is_overdue(now) {
            stats.overdue += 1;
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{admin_user, regular_user, sample_request};
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    #[test]
    fn visibility_by_sector() {
        let mut request = sample_request("2025000001");
        request.sector_id = Some("sec-a".into());

        assert!(is_visible(&admin_user(), &request));
        assert!(is_visible(&regular_user("ana", "sec-a"), &request));
        assert!(!is_visible(&regular_user("bob", "sec-b"), &request));

        request.sector_id = None;
        assert!(is_visible(&admin_user(), &request));
        assert!(!is_visible(&regular_user("ana", "sec-a"), &request));
    }

    #[test]
    fn orphaned_references_resolve_to_placeholders() {
        let mut request = sample_request("2025000001");
        request.category_id = Some("cat-deleted".into());
        request.sector_id = Some("sec-deleted".into());

        let view = Catalog::new(Vec::new(), Vec::new()).resolve(request, Utc::now());
        assert_eq!(view.category_name, NO_CATEGORY);
        assert_eq!(view.category_color, None);
        assert_eq!(view.sector_name, NO_SECTOR);
    }

    #[test]
    fn overdue_ignores_completed() {
        let now = Utc::now();
        let mut late = sample_request("2025000001");
        late.due_at = Some(now - Duration::hours(1));
        let mut done = late.clone();
        done.status = RequestStatus::Completed;
        let mut future = sample_request("2025000003");
        future.due_at = Some(now + Duration::hours(1));

        let stats = count(&[late, done, future], now);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.by_status["pending"], 2);
        assert_eq!(stats.by_status["completed"], 1);
        assert_eq!(stats.by_status["uncategorized"], 0);
        assert_eq!(stats.by_priority["medium"], 3);
    }

    #[test]
    fn grouping_keeps_board_order() {
        let mut a = sample_request("2025000001");
        a.status = RequestStatus::Completed;
        let b = sample_request("2025000002");
        let catalog = Catalog::new(Vec::new(), Vec::new());
        let now = Utc::now();

        let board = group(vec![catalog.resolve(a, now), catalog.resolve(b, now)]);
        let labels: Vec<&str> = board.columns.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["UNCATEGORIZED", "PENDING", "IN PROGRESS", "COMPLETED"]);
        assert_eq!(board.total(), 2);
        assert_eq!(board.column(RequestStatus::Completed).unwrap().requests.len(), 1);
    }
}
