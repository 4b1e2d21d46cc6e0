//! Repository methods on [`crate::service::BoardService`], one module per
//! concern.

pub mod audit;
pub mod board;
pub mod catalog;
pub mod request;
pub mod user;
