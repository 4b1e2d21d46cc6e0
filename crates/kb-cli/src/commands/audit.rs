use crate::cli::GlobalFlags;
use crate::cli::root_commands::AuditArgs;
use crate::commands::shared::visibility::find_visible;
use crate::context::AppContext;
use crate::output::output;

/// Handle `kb audit`.
///
/// The whole trail and lookups by protocol are for administrators, since a
/// protocol may belong to a deleted request whose sector is no longer known.
/// Any logged-in user may read the trail of a request they can see.
pub fn handle(args: &AuditArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut entries = if let Some(request) = args.request.as_deref() {
        let viewer = ctx.require_user()?;
        if find_visible(&ctx.board, &viewer, request)?.is_none() && !viewer.is_admin() {
            anyhow::bail!("request '{request}' not found");
        }
        ctx.board.audit_for_request(request)?
    } else if let Some(protocol) = args.protocol.as_deref() {
        ctx.require_admin()?;
        ctx.board.audit_for_protocol(protocol)?
    } else {
        ctx.require_admin()?;
        ctx.board.list_audit()?
    };

    if let Some(limit) = flags.limit {
        entries.truncate(usize::try_from(limit)?);
    }
    output(&entries, flags.format)
}
