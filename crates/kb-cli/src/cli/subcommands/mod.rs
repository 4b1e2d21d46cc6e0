mod admin;
mod logs;
mod request;

pub use admin::{CategoryCommands, SectorCommands, UserCommands};
pub use logs::LogsCommands;
pub use request::RequestCommands;
