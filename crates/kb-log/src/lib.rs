//! # kb-log
//!
//! The system log: a bounded ring buffer of [`LogEntry`] values, persisted
//! to the `system-logs` collection, mirrored to `tracing`, observable through
//! subscriptions, and queryable by filter, export and statistics.
//!
//! [`LogEntry`]: kb_core::entities::LogEntry

pub mod categories;
pub mod error;
pub mod export;
pub mod filter;
pub mod logger;
pub mod panic;
pub mod stats;

pub use error::LogError;
pub use export::ExportFormat;
pub use filter::LogFilter;
pub use logger::{DEFAULT_MAX_ENTRIES, SubscriptionId, SystemLogger};
pub use panic::install_panic_hook;
pub use stats::LogStats;
