//! Category and sector administration.
//!
//! Removing either never touches requests; the read side resolves orphaned
//! references to "No category" / "No sector".

use chrono::Utc;
use kb_core::actor::Actor;
use kb_core::entities::{Category, Sector};
use kb_core::enums::LogLevel;
use kb_core::ids::{PREFIX_CATEGORY, PREFIX_SECTOR, generate_id};
use kb_log::categories;
use kb_store::Collection;
use serde_json::json;

use crate::error::BoardError;
use crate::service::BoardService;
use crate::updates::category::CategoryUpdate;
use crate::updates::sector::SectorUpdate;

pub const DEFAULT_CATEGORY_COLOR: &str = "#3B82F6";

/// `#RRGGBB`.
fn validate_color(color: &str) -> Result<(), BoardError> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(())
    } else {
        Err(BoardError::Validation(format!(
            "color must be #RRGGBB, got '{color}'"
        )))
    }
}

fn validate_name(kind: &str, name: &str) -> Result<String, BoardError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(BoardError::Validation(format!("{kind} name is required")));
    }
    Ok(name.to_string())
}

impl BoardService {
    // -----------------------------------------------------------------------
    // Categories
    // -----------------------------------------------------------------------

    /// # Errors
    ///
    /// Returns `BoardError::Store` if the collection cannot be read.
    pub fn list_categories(&self) -> Result<Vec<Category>, BoardError> {
        self.load(Collection::Categories, "list categories", &Actor::system())
    }

    /// # Errors
    ///
    /// Returns `BoardError::Validation` for a blank name or a malformed color,
    /// `BoardError::Store` if the collection cannot be written.
    pub fn create_category(
        &self,
        name: &str,
        color: Option<&str>,
        actor: &Actor,
    ) -> Result<Category, BoardError> {
        let name = validate_name("category", name)?;
        let color = color.unwrap_or(DEFAULT_CATEGORY_COLOR);
        validate_color(color)?;

        let category = Category {
            id: generate_id(PREFIX_CATEGORY)?,
            name,
            color: color.to_uppercase(),
            created_at: Utc::now(),
        };
        let mut all: Vec<Category> = self.load(Collection::Categories, "create category", actor)?;
        all.push(category.clone());
        self.save(Collection::Categories, &all, "create category", actor)?;

        self.logger().log_admin(
            "Category created",
            &category.name,
            actor,
            Some(json!({ "after": category })),
        );
        Ok(category)
    }

    /// # Errors
    ///
    /// Returns `BoardError::Validation` for a blank name or a malformed color,
    /// `BoardError::Store` if the collection cannot be read or written.
    pub fn update_category(
        &self,
        id: &str,
        update: CategoryUpdate,
        actor: &Actor,
    ) -> Result<Option<Category>, BoardError> {
        let name = update
            .name
            .as_deref()
            .map(|n| validate_name("category", n))
            .transpose()?;
        if let Some(color) = &update.color {
            validate_color(color)?;
        }

        let mut all: Vec<Category> = self.load(Collection::Categories, "update category", actor)?;
        let Some(category) = all.iter_mut().find(|c| c.id == id) else {
            self.warn_missing_admin("category", id, "update", actor);
            return Ok(None);
        };
        let before = category.clone();
        if let Some(name) = name {
            category.name = name;
        }
        if let Some(color) = update.color {
            category.color = color.to_uppercase();
        }
        let after = category.clone();
        self.save(Collection::Categories, &all, "update category", actor)?;

        self.logger().log_admin(
            "Category updated",
            &after.name,
            actor,
            Some(json!({ "before": before, "after": after })),
        );
        Ok(Some(after))
    }

    /// # Errors
    ///
    /// Returns `BoardError::Store` if the collection cannot be read or written.
    pub fn remove_category(&self, id: &str, actor: &Actor) -> Result<bool, BoardError> {
        let mut all: Vec<Category> = self.load(Collection::Categories, "remove category", actor)?;
        let Some(index) = all.iter().position(|c| c.id == id) else {
            self.warn_missing_admin("category", id, "remove", actor);
            return Ok(false);
        };
        let removed = all.remove(index);
        self.save(Collection::Categories, &all, "remove category", actor)?;

        self.logger().log_admin(
            "Category removed",
            &removed.name,
            actor,
            Some(json!({ "before": removed })),
        );
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Sectors
    // -----------------------------------------------------------------------

    /// # Errors
    ///
    /// Returns `BoardError::Store` if the collection cannot be read.
    pub fn list_sectors(&self) -> Result<Vec<Sector>, BoardError> {
        self.load(Collection::Sectors, "list sectors", &Actor::system())
    }

    /// # Errors
    ///
    /// Returns `BoardError::Validation` for a blank name, `BoardError::Store`
    /// if the collection cannot be written.
    pub fn create_sector(&self, name: &str, actor: &Actor) -> Result<Sector, BoardError> {
        let name = validate_name("sector", name)?;
        let sector = Sector {
            id: generate_id(PREFIX_SECTOR)?,
            name,
            created_at: Utc::now(),
        };
        let mut all: Vec<Sector> = self.load(Collection::Sectors, "create sector", actor)?;
        all.push(sector.clone());
        self.save(Collection::Sectors, &all, "create sector", actor)?;

        self.logger().log_admin(
            "Sector created",
            &sector.name,
            actor,
            Some(json!({ "after": sector })),
        );
        Ok(sector)
    }

    /// # Errors
    ///
    /// Returns `BoardError::Validation` for a blank name, `BoardError::Store`
    /// if the collection cannot be read or written.
    pub fn update_sector(
        &self,
        id: &str,
        update: SectorUpdate,
        actor: &Actor,
    ) -> Result<Option<Sector>, BoardError> {
        let name = update
            .name
            .as_deref()
            .map(|n| validate_name("sector", n))
            .transpose()?;

        let mut all: Vec<Sector> = self.load(Collection::Sectors, "update sector", actor)?;
        let Some(sector) = all.iter_mut().find(|s| s.id == id) else {
            self.warn_missing_admin("sector", id, "update", actor);
            return Ok(None);
        };
        let before = sector.clone();
        if let Some(name) = name {
            sector.name = name;
        }
        let after = sector.clone();
        self.save(Collection::Sectors, &all, "update sector", actor)?;

        self.logger().log_admin(
            "Sector updated",
            &after.name,
            actor,
            Some(json!({ "before": before, "after": after })),
        );
        Ok(Some(after))
    }

    /// # Errors
    ///
    /// Returns `BoardError::Store` if the collection cannot be read or written.
    pub fn remove_sector(&self, id: &str, actor: &Actor) -> Result<bool, BoardError> {
        let mut all: Vec<Sector> = self.load(Collection::Sectors, "remove sector", actor)?;
        let Some(index) = all.iter().position(|s| s.id == id) else {
            self.warn_missing_admin("sector", id, "remove", actor);
            return Ok(false);
        };
        let removed = all.remove(index);
        self.save(Collection::Sectors, &all, "remove sector", actor)?;

        self.logger().log_admin(
            "Sector removed",
            &removed.name,
            actor,
            Some(json!({ "before": removed })),
        );
        Ok(true)
    }

    pub(crate) fn warn_missing_admin(&self, entity: &str, id: &str, operation: &str, actor: &Actor) {
        self.logger().log(
            LogLevel::Warn,
            categories::ADMIN,
            format!("Attempt to {operation} a missing {entity}"),
            Some(json!({ "id": id, "operation": operation })),
            Some(actor),
        );
    }
}
