use std::path::Path;

use anyhow::Context;
use kb_core::enums::LogLevel;
use kb_log::{ExportFormat, LogFilter};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::LogsCommands;
use crate::commands::shared::parse::{parse_date, parse_enum};
use crate::context::AppContext;
use crate::output::output;

/// Handle `kb logs`. Administrators only.
pub fn handle(action: LogsCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let admin = ctx.require_admin()?;

    match action {
        LogsCommands::List {
            level,
            category,
            from,
            to,
            search,
        } => {
            let mut filter = LogFilter::default();
            if let Some(level) = level.as_deref() {
                filter = filter.level(parse_enum::<LogLevel>(level, "level")?);
            }
            if let Some(category) = category {
                filter = filter.category(category);
            }
            if let Some(from) = from.as_deref() {
                filter = filter.date_from(parse_date(from, "from")?);
            }
            if let Some(to) = to.as_deref() {
                filter = filter.date_to(parse_date(to, "to")?);
            }
            if let Some(search) = search {
                filter = filter.search(search);
            }

            let mut entries = ctx.logger.get_logs(&filter);
            if let Some(limit) = flags.limit {
                entries.truncate(usize::try_from(limit)?);
            }
            output(&entries, flags.format)
        }
        LogsCommands::Export { format, output: path } => {
            let format: ExportFormat = format.parse().map_err(anyhow::Error::msg)?;
            let rendered = ctx.logger.export_logs(format)?;
            match path {
                Some(path) => {
                    write_export(Path::new(&path), &rendered)?;
                    if !flags.quiet {
                        eprintln!("exported {} entries to {path}", ctx.logger.len());
                    }
                }
                None => println!("{rendered}"),
            }
            Ok(())
        }
        LogsCommands::Stats => output(&ctx.logger.stats(), flags.format),
        LogsCommands::Clear => {
            let cleared = ctx.logger.len();
            ctx.logger.clear_logs();
            tracing::info!(login = %admin.login, cleared, "system log cleared");
            output(&serde_json::json!({ "cleared": cleared }), flags.format)
        }
    }
}

fn write_export(path: &Path, contents: &str) -> anyhow::Result<()> {
    std::fs::write(path, contents)
        .with_context(|| format!("failed to write export to {}", path.display()))
}
