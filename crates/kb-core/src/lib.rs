//! # kb-core
//!
//! Core types, ID generation, and error types for the kanban request board.
//!
//! This crate provides the foundational types shared across all board crates:
//! - Entity structs for all domain objects (requests, categories, sectors, users,
//!   audit entries, system log entries)
//! - Status, priority, role, audit action and log level enums
//! - ID prefix constants, ID generation, and protocol formatting
//! - Salted credential hashing
//! - The acting-user identity passed through every mutation
//! - Typed detail payloads for log entries
//! - Cross-cutting error types

pub mod actor;
pub mod audit_detail;
pub mod credential;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
