use kb_board::{EntryPoint, NewRequest};
use kb_core::actor::Actor;
use kb_core::enums::Priority;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SubmitArgs;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `kb submit`: the public form, no login needed.
pub fn handle(args: SubmitArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let priority = match args.priority.as_deref() {
        Some(raw) => parse_enum::<Priority>(raw, "priority")?,
        None => Priority::default(),
    };
    let input = NewRequest {
        category_id: args.category,
        sector_id: args.sector,
        priority,
        ..NewRequest::new(args.title, args.description)
    };

    let created = ctx
        .board
        .create_request(input, EntryPoint::Public, &Actor::system())?;
    output(
        &json!({
            "protocol": created.protocol,
            "id": created.request.id,
            "status": created.request.status,
        }),
        flags.format,
    )
}
