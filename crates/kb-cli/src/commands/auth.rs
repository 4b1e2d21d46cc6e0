use kb_board::UserSummary;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{LoginArgs, PasswdArgs};
use crate::context::AppContext;
use crate::output::output;

/// Handle `kb login`.
pub fn login(args: &LoginArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let Some(user) = ctx.session.login(&args.login, &args.password)? else {
        anyhow::bail!("invalid login or password");
    };
    if user.must_change_password && !flags.quiet {
        eprintln!("password change required: run 'kb passwd --current <old> --new <new>'");
    }
    output(&UserSummary::from(&user), flags.format)
}

/// Handle `kb logout`.
pub fn logout(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let was_logged_in = ctx.session.logout()?;
    output(&serde_json::json!({ "logged_out": was_logged_in }), flags.format)
}

/// Handle `kb whoami`.
pub fn whoami(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let user = ctx.require_user()?;
    output(&UserSummary::from(&user), flags.format)
}

/// Handle `kb passwd`.
pub fn passwd(args: &PasswdArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.require_user()?;
    if !ctx.session.change_password(&args.current, &args.new)? {
        anyhow::bail!("current password does not match");
    }
    output(&serde_json::json!({ "password_changed": true }), flags.format)
}
