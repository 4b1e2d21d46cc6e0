use clap::{Args, Subcommand};

use crate::cli::subcommands::{
    CategoryCommands, LogsCommands, RequestCommands, SectorCommands, UserCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Requests on the board (requires login).
    Request {
        #[command(subcommand)]
        action: RequestCommands,
    },
    /// Submit a request anonymously. It lands in the uncategorized column.
    Submit(SubmitArgs),
    /// View the audit trail.
    Audit(AuditArgs),
    /// System log (admin only).
    Logs {
        #[command(subcommand)]
        action: LogsCommands,
    },
    /// Log in and persist the session.
    Login(LoginArgs),
    /// End the current session.
    Logout,
    /// Show the logged-in user.
    Whoami,
    /// Change the logged-in user's password.
    Passwd(PasswdArgs),
    /// Categories (admin only for changes).
    Category {
        #[command(subcommand)]
        action: CategoryCommands,
    },
    /// Sectors (admin only for changes).
    Sector {
        #[command(subcommand)]
        action: SectorCommands,
    },
    /// Users (admin only).
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
}

/// Arguments for `kb submit`.
#[derive(Clone, Debug, Args)]
pub struct SubmitArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub sector: Option<String>,
    #[arg(long)]
    pub priority: Option<String>,
}

/// Arguments for `kb audit`.
#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    /// Only entries for this request ID.
    #[arg(long, conflicts_with = "protocol")]
    pub request: Option<String>,
    /// Only entries for this protocol (works for deleted requests).
    #[arg(long)]
    pub protocol: Option<String>,
}

/// Arguments for `kb login`.
#[derive(Clone, Debug, Args)]
pub struct LoginArgs {
    pub login: String,
    #[arg(long)]
    pub password: String,
}

/// Arguments for `kb passwd`.
#[derive(Clone, Debug, Args)]
pub struct PasswdArgs {
    #[arg(long)]
    pub current: String,
    #[arg(long)]
    pub new: String,
}
