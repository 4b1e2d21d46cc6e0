use anyhow::Context;
use clap::Parser;
use kb_config::KanbanConfig;

mod cli;
mod commands;
mod context;
mod output;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("kb error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let config = KanbanConfig::load_with_dotenv().context("failed to load configuration")?;
    init_tracing(cli.quiet, cli.verbose, &config.logging.console_level)?;

    let flags = cli.global_flags();
    context::warn_unconfigured(&config);

    let ctx = context::AppContext::init(config)
        .context("failed to initialize kanban application context")?;

    let result = commands::dispatch::dispatch(cli.command, &ctx, &flags);

    // Notifications are fire-and-forget for the command, but the process
    // must not exit before they finish or time out.
    let flushed = ctx.board.flush_notifications().await;
    if flushed > 0 {
        tracing::debug!(flushed, "notifications settled");
    }
    result
}

fn init_tracing(quiet: bool, verbose: bool, default_level: &str) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        default_level
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("KANBAN_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
