use clap::Subcommand;

/// Category commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CategoryCommands {
    Add {
        name: String,
        /// Hex color, e.g. #3B82F6.
        #[arg(long)]
        color: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    Remove {
        id: String,
    },
    List,
}

/// Sector commands.
#[derive(Clone, Debug, Subcommand)]
pub enum SectorCommands {
    Add {
        name: String,
    },
    Update {
        id: String,
        #[arg(long)]
        name: String,
    },
    Remove {
        id: String,
    },
    List,
}

/// User commands.
#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    Add {
        login: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        password: String,
        /// admin or user.
        #[arg(long, default_value = "user")]
        role: String,
        /// Required for role=user.
        #[arg(long)]
        sector: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        login: Option<String>,
        #[arg(long)]
        name: Option<String>,
        /// Reset the password.
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        sector: Option<String>,
    },
    Remove {
        id: String,
    },
    List,
}
