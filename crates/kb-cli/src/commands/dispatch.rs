use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Request { action } => commands::request::handle(action, ctx, flags),
        Commands::Submit(args) => commands::submit::handle(args, ctx, flags),
        Commands::Audit(args) => commands::audit::handle(&args, ctx, flags),
        Commands::Logs { action } => commands::logs::handle(action, ctx, flags),
        Commands::Login(args) => commands::auth::login(&args, ctx, flags),
        Commands::Logout => commands::auth::logout(ctx, flags),
        Commands::Whoami => commands::auth::whoami(ctx, flags),
        Commands::Passwd(args) => commands::auth::passwd(&args, ctx, flags),
        Commands::Category { action } => commands::admin::category(action, ctx, flags),
        Commands::Sector { action } => commands::admin::sector(action, ctx, flags),
        Commands::User { action } => commands::admin::user(action, ctx, flags),
    }
}
