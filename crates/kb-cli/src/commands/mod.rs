pub mod admin;
pub mod audit;
pub mod auth;
pub mod dispatch;
pub mod logs;
pub mod request;
pub mod shared;
pub mod submit;
