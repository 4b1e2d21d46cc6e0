//! Patch types for entity mutations.
//!
//! Each patch lists only the fields that may change; `None` leaves a field
//! untouched. Nullable fields use `Option<Option<T>>` so a patch can clear
//! them. Builders produce the patches with `#[must_use]` chained setters.

pub mod category;
pub mod request;
pub mod sector;
pub mod user;
