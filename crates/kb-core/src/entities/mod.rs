//! Entity structs for all board domain objects.
//!
//! Each entity is stored as one element of a whole-collection JSON document
//! (see `kb-store`). All structs derive `Serialize`, `Deserialize`, and
//! `JsonSchema` for JSON roundtrip and schema validation.

mod audit;
mod category;
mod log_entry;
mod request;
mod sector;
mod user;

pub use audit::AuditEntry;
pub use category::Category;
pub use log_entry::{LogEntry, LogOrigin};
pub use request::Request;
pub use sector::Sector;
pub use user::{User, UserRole};
