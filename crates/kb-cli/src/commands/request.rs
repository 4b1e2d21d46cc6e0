use kb_board::updates::request::RequestUpdateBuilder;
use kb_board::{EntryPoint, NewRequest};
use kb_core::enums::{Priority, RequestStatus};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::RequestCommands;
use crate::commands::shared::parse::{nullable, parse_due, parse_enum};
use crate::commands::shared::visibility::find_visible;
use crate::context::AppContext;
use crate::output::output;

/// Handle `kb request`.
pub fn handle(action: RequestCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let viewer = ctx.require_user()?;
    let actor = ctx.actor();
    let board = &ctx.board;

    match action {
        RequestCommands::Create {
            title,
            description,
            category,
            sector,
            priority,
            due,
            notes,
            status,
        } => {
            let input = NewRequest {
                category_id: category,
                sector_id: sector,
                priority: priority
                    .as_deref()
                    .map(|raw| parse_enum::<Priority>(raw, "priority"))
                    .transpose()?
                    .unwrap_or_default(),
                due_at: due.as_deref().map(parse_due).transpose()?,
                notes,
                status: status
                    .as_deref()
                    .map(|raw| parse_enum::<RequestStatus>(raw, "status"))
                    .transpose()?,
                ..NewRequest::new(title, description)
            };
            let created = board.create_request(input, EntryPoint::Dashboard, &actor)?;
            output(&created, flags.format)
        }
        RequestCommands::Update {
            id,
            title,
            description,
            category,
            sector,
            status,
            priority,
            due,
            notes,
        } => {
            let mut builder = RequestUpdateBuilder::new();
            if let Some(title) = title {
                builder = builder.title(title);
            }
            if let Some(description) = description {
                builder = builder.description(description);
            }
            if let Some(category) = nullable(category) {
                builder = builder.category_id(category);
            }
            if let Some(sector) = nullable(sector) {
                builder = builder.sector_id(sector);
            }
            if let Some(status) = status.as_deref() {
                builder = builder.status(parse_enum::<RequestStatus>(status, "status")?);
            }
            if let Some(priority) = priority.as_deref() {
                builder = builder.priority(parse_enum::<Priority>(priority, "priority")?);
            }
            if let Some(due) = due {
                let due = if due.trim().is_empty() {
                    None
                } else {
                    Some(parse_due(&due)?)
                };
                builder = builder.due_at(due);
            }
            if let Some(notes) = nullable(notes) {
                builder = builder.notes(notes);
            }
            let update = builder.build();
            if update.is_empty() {
                anyhow::bail!("nothing to update: pass at least one field flag");
            }

            let target = require_visible(ctx, &viewer, &id)?;
            let updated = board.update_request(&target, update, &actor)?;
            output(&updated, flags.format)
        }
        RequestCommands::Move { id, status } => {
            let status = parse_enum::<RequestStatus>(&status, "status")?;
            let target = require_visible(ctx, &viewer, &id)?;
            let moved = board.move_request(&target, status, &actor)?;
            output(&moved, flags.format)
        }
        RequestCommands::Delete { id } => {
            let target = require_visible(ctx, &viewer, &id)?;
            let deleted = board.delete_request(&target, &actor)?;
            output(&serde_json::json!({ "id": target, "deleted": deleted }), flags.format)
        }
        RequestCommands::Get { id } => {
            let Some(request) = find_visible(board, &viewer, &id)? else {
                anyhow::bail!("request '{id}' not found");
            };
            output(&board.request_view(request)?, flags.format)
        }
        RequestCommands::List { search } => {
            let mut views = board.search_requests(&viewer, search.as_deref().unwrap_or_default())?;
            if let Some(limit) = flags.limit {
                views.truncate(usize::try_from(limit)?);
            }
            output(&views, flags.format)
        }
        RequestCommands::Board { search } => {
            output(&board.board(&viewer, search.as_deref())?, flags.format)
        }
        RequestCommands::Stats => output(&board.stats(&viewer)?, flags.format),
    }
}

/// Resolve an ID or protocol to the ID of a request the viewer may touch.
///
/// An unknown ID is passed through unchanged so the board records the
/// attempt; a request outside the viewer's sector is refused outright.
fn require_visible(
    ctx: &AppContext,
    viewer: &kb_core::entities::User,
    id_or_protocol: &str,
) -> anyhow::Result<String> {
    if let Some(request) = find_visible(&ctx.board, viewer, id_or_protocol)? {
        return Ok(request.id);
    }
    let exists = ctx.board.get_request(id_or_protocol)?.is_some()
        || ctx.board.get_request_by_protocol(id_or_protocol)?.is_some();
    if exists {
        anyhow::bail!("request '{id_or_protocol}' is outside your sector");
    }
    Ok(id_or_protocol.to_string())
}
