use kb_board::updates::category::CategoryUpdateBuilder;
use kb_board::updates::sector::SectorUpdate;
use kb_board::updates::user::UserUpdateBuilder;
use kb_board::{NewUser, UserSummary};
use kb_core::actor::Actor;
use kb_core::enums::Role;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{CategoryCommands, SectorCommands, UserCommands};
use crate::commands::shared::parse::{nullable, parse_enum};
use crate::context::AppContext;
use crate::output::output;

/// Handle `kb category`. Listing is open to any logged-in user.
pub fn category(
    action: CategoryCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        CategoryCommands::List => {
            ctx.require_user()?;
            output(&ctx.board.list_categories()?, flags.format)
        }
        CategoryCommands::Add { name, color } => {
            let actor = admin_actor(ctx)?;
            let created = ctx
                .board
                .create_category(&name, color.as_deref(), &actor)?;
            output(&created, flags.format)
        }
        CategoryCommands::Update { id, name, color } => {
            let actor = admin_actor(ctx)?;
            let mut builder = CategoryUpdateBuilder::new();
            if let Some(name) = name {
                builder = builder.name(name);
            }
            if let Some(color) = color {
                builder = builder.color(color);
            }
            let updated = ctx.board.update_category(&id, builder.build(), &actor)?;
            output(&updated, flags.format)
        }
        CategoryCommands::Remove { id } => {
            let actor = admin_actor(ctx)?;
            let removed = ctx.board.remove_category(&id, &actor)?;
            output(&serde_json::json!({ "id": id, "removed": removed }), flags.format)
        }
    }
}

/// Handle `kb sector`. Listing is open to any logged-in user.
pub fn sector(action: SectorCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        SectorCommands::List => {
            ctx.require_user()?;
            output(&ctx.board.list_sectors()?, flags.format)
        }
        SectorCommands::Add { name } => {
            let actor = admin_actor(ctx)?;
            output(&ctx.board.create_sector(&name, &actor)?, flags.format)
        }
        SectorCommands::Update { id, name } => {
            let actor = admin_actor(ctx)?;
            let updated = ctx
                .board
                .update_sector(&id, SectorUpdate::name(name), &actor)?;
            output(&updated, flags.format)
        }
        SectorCommands::Remove { id } => {
            let actor = admin_actor(ctx)?;
            let removed = ctx.board.remove_sector(&id, &actor)?;
            output(&serde_json::json!({ "id": id, "removed": removed }), flags.format)
        }
    }
}

/// Handle `kb user`. Output never includes credentials.
pub fn user(action: UserCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let actor = admin_actor(ctx)?;

    match action {
        UserCommands::Add {
            login,
            name,
            password,
            role,
            sector,
        } => {
            let input = NewUser {
                login,
                display_name: name.unwrap_or_default(),
                password,
                role: parse_enum::<Role>(&role, "role")?,
                sector_id: sector,
            };
            let created = ctx.board.create_user(input, &actor)?;
            output(&UserSummary::from(&created), flags.format)
        }
        UserCommands::Update {
            id,
            login,
            name,
            password,
            role,
            sector,
        } => {
            let mut builder = UserUpdateBuilder::new();
            if let Some(login) = login {
                builder = builder.login(login);
            }
            if let Some(name) = name {
                builder = builder.display_name(name);
            }
            if let Some(password) = password {
                builder = builder.password(password);
            }
            if let Some(role) = role.as_deref() {
                builder = builder.role(parse_enum::<Role>(role, "role")?);
            }
            if let Some(sector) = nullable(sector) {
                builder = builder.sector_id(sector);
            }
            let updated = ctx.board.update_user(&id, builder.build(), &actor)?;
            output(&updated.as_ref().map(UserSummary::from), flags.format)
        }
        UserCommands::Remove { id } => {
            let removed = ctx.board.remove_user(&id, &actor)?;
            output(&serde_json::json!({ "id": id, "removed": removed }), flags.format)
        }
        UserCommands::List => {
            let users: Vec<UserSummary> = ctx
                .board
                .list_users()?
                .iter()
                .map(UserSummary::from)
                .collect();
            output(&users, flags.format)
        }
    }
}

fn admin_actor(ctx: &AppContext) -> anyhow::Result<Actor> {
    ctx.require_admin()?;
    Ok(ctx.actor())
}
