use clap::Subcommand;

/// Request commands. Nullable fields are cleared by passing an empty value.
#[derive(Clone, Debug, Subcommand)]
pub enum RequestCommands {
    /// Create a request from the dashboard (starts pending).
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        sector: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        /// RFC 3339 timestamp or YYYY-MM-DD.
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Update fields of a request.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        sector: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Move a request to another column.
    Move { id: String, status: String },
    /// Delete a request.
    Delete { id: String },
    /// Get a request by ID or protocol.
    Get { id: String },
    /// List visible requests.
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Visible requests grouped by column.
    Board {
        #[arg(long)]
        search: Option<String>,
    },
    /// Counters over visible requests.
    Stats,
}
