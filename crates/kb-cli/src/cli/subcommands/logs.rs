use clap::Subcommand;

/// System log commands.
#[derive(Clone, Debug, Subcommand)]
pub enum LogsCommands {
    /// List entries, newest first.
    List {
        #[arg(long)]
        level: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Inclusive start date (YYYY-MM-DD, UTC).
        #[arg(long)]
        from: Option<String>,
        /// Inclusive end date (YYYY-MM-DD, UTC).
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Export every entry as json or csv.
    Export {
        #[arg(long, default_value = "json")]
        format: String,
        /// Write to a file instead of stdout.
        #[arg(long)]
        output: Option<String>,
    },
    /// Counters by level and category.
    Stats,
    /// Remove every entry.
    Clear,
}
