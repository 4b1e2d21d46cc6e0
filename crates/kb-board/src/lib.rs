//! # kb-board
//!
//! Request lifecycle for the kanban board.
//!
//! [`BoardService`] is the only writer path for requests. Every mutation
//! validates its input, persists through the record store, appends audit
//! entries, writes system log entries and spawns chat notifications without
//! waiting for them. The same service hosts category, sector and user
//! administration and the visibility-filtered read side; [`SessionManager`]
//! sits on top of it as the login boundary.

pub mod diff;
pub mod error;
pub mod repos;
pub mod service;
pub mod session;
pub mod updates;
pub mod view;

mod test_support;

pub use error::BoardError;
pub use repos::audit::AuditInput;
pub use repos::request::{CreatedRequest, EntryPoint, NewRequest};
pub use repos::user::{NewUser, UserSummary};
pub use service::BoardService;
pub use session::{SessionManager, SessionMarker};
pub use view::{Board, BoardStats, Column, RequestView};
