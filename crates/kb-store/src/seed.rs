//! First-run data. Each collection is seeded only when it has never been
//! written; existing data is never overwritten.

use chrono::{Duration, Utc};
use kb_core::credential::PasswordHash;
use kb_core::entities::{AuditEntry, Category, Request, Sector, User, UserRole};
use kb_core::enums::{Priority, RequestStatus};
use kb_core::ids::{PREFIX_CATEGORY, PREFIX_REQUEST, PREFIX_SECTOR, PREFIX_USER, generate_id};

use crate::protocol::protocol_sequence;
use crate::{Collection, ProtocolGenerator, RecordStore, StoreError};

pub const DEFAULT_ADMIN_LOGIN: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin";
pub const DEFAULT_ADMIN_NAME: &str = "Administrator";

const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("Support", "#3B82F6"),
    ("Development", "#059669"),
    ("Infrastructure", "#DC2626"),
];

const DEFAULT_SECTORS: &[&str] = &["Marketing", "Infrastructure", "Network", "Development"];

/// Collections written by a [`RecordStore::seed_defaults`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub seeded: Vec<Collection>,
}

impl SeedReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seeded.is_empty()
    }
}

impl RecordStore {
    /// Write default users, categories, sectors, sample requests, an empty
    /// audit log and a protocol counter, skipping every collection that
    /// already exists.
    ///
    /// A missing counter starts at the highest sequence already held by a
    /// stored request, zero for a fresh store.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if a collection cannot be read or written.
    pub fn seed_defaults(&self) -> Result<SeedReport, StoreError> {
        let mut report = SeedReport::default();
        let now = Utc::now();

        if !self.contains(Collection::Users)? {
            let admin = User {
                id: generate_id(PREFIX_USER)?,
                login: DEFAULT_ADMIN_LOGIN.to_string(),
                display_name: DEFAULT_ADMIN_NAME.to_string(),
                credential: PasswordHash::hash(DEFAULT_ADMIN_PASSWORD)?,
                must_change_password: true,
                role: UserRole::Admin,
                created_at: now,
            };
            self.set(Collection::Users, &[admin])?;
            report.seeded.push(Collection::Users);
        }

        if !self.contains(Collection::Categories)? {
            let categories = DEFAULT_CATEGORIES
                .iter()
                .map(|(name, color)| {
                    Ok(Category {
                        id: generate_id(PREFIX_CATEGORY)?,
                        name: (*name).to_string(),
                        color: (*color).to_string(),
                        created_at: now,
                    })
                })
                .collect::<Result<Vec<_>, StoreError>>()?;
            self.set(Collection::Categories, &categories)?;
            report.seeded.push(Collection::Categories);
        }

        if !self.contains(Collection::Sectors)? {
            let sectors = DEFAULT_SECTORS
                .iter()
                .map(|name| {
                    Ok(Sector {
                        id: generate_id(PREFIX_SECTOR)?,
                        name: (*name).to_string(),
                        created_at: now,
                    })
                })
                .collect::<Result<Vec<_>, StoreError>>()?;
            self.set(Collection::Sectors, &sectors)?;
            report.seeded.push(Collection::Sectors);
        }

        if !self.contains(Collection::ProtocolCounter)? {
            let issued = self.highest_issued_sequence();
            self.set_value(Collection::ProtocolCounter, &issued)?;
            report.seeded.push(Collection::ProtocolCounter);
        }

        if !self.contains(Collection::Requests)? {
            let samples = self.sample_requests()?;
            self.set(Collection::Requests, &samples)?;
            report.seeded.push(Collection::Requests);
        }

        if !self.contains(Collection::AuditLog)? {
            self.set::<AuditEntry>(Collection::AuditLog, &[])?;
            report.seeded.push(Collection::AuditLog);
        }

        if !report.is_empty() {
            tracing::info!(seeded = ?report.seeded, "store seeded with defaults");
        }
        Ok(report)
    }

    fn highest_issued_sequence(&self) -> u64 {
        let requests: Vec<Request> = match self.get(Collection::Requests) {
            Ok(requests) => requests,
            Err(e) => {
                tracing::warn!(%e, "requests unreadable while seeding protocol counter");
                return 0;
            }
        };
        requests
            .iter()
            .filter_map(|r| protocol_sequence(&r.protocol))
            .max()
            .unwrap_or(0)
    }

    fn sample_requests(&self) -> Result<Vec<Request>, StoreError> {
        let categories: Vec<Category> = self.get(Collection::Categories)?;
        let sectors: Vec<Sector> = self.get(Collection::Sectors)?;
        let category_id = |name: &str| {
            categories
                .iter()
                .find(|c| c.name == name)
                .map(|c| c.id.clone())
        };
        let sector_id = |name: &str| sectors.iter().find(|s| s.name == name).map(|s| s.id.clone());

        let protocols = ProtocolGenerator::new(self.clone());
        let now = Utc::now();
        let one_day_ago = now - Duration::days(1);
        let two_days_ago = now - Duration::days(2);

        Ok(vec![
            Request {
                id: generate_id(PREFIX_REQUEST)?,
                protocol: protocols.next_protocol()?,
                title: "Email setup".to_string(),
                description: "Set up a corporate email account for a new employee".to_string(),
                category_id: category_id("Support"),
                sector_id: sector_id("Marketing"),
                status: RequestStatus::Pending,
                priority: Priority::Medium,
                created_by: None,
                created_at: one_day_ago,
                updated_at: one_day_ago,
                due_at: None,
                notes: None,
            },
            Request {
                id: generate_id(PREFIX_REQUEST)?,
                protocol: protocols.next_protocol()?,
                title: "New feature development".to_string(),
                description: "Implement a reporting system in the dashboard".to_string(),
                category_id: category_id("Development"),
                sector_id: sector_id("Development"),
                status: RequestStatus::InProgress,
                priority: Priority::High,
                created_by: None,
                created_at: two_days_ago,
                updated_at: now,
                due_at: None,
                notes: None,
            },
        ])
    }
}
