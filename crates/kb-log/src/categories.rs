//! Well-known log categories.

pub const AUTH: &str = "AUTH";
pub const REQUEST: &str = "REQUEST";
pub const ADMIN: &str = "ADMIN";
pub const SYSTEM: &str = "SYSTEM";
pub const NOTIFY: &str = "NOTIFY";
pub const ERROR: &str = "ERROR";
/// Panics caught by the process-wide hook.
pub const GLOBAL_ERROR: &str = "GLOBAL_ERROR";
/// Background tasks that panicked or were cancelled.
pub const UNHANDLED_TASK: &str = "UNHANDLED_TASK";
