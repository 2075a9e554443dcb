// Discord commands for the leveling system.
//
// **Notice the pattern:**
// 1. Extract primitive data from Discord types
// 2. Call core service
// 3. Format the response based on the result
//
// This layer is THIN - no business logic, just translation.

use crate::core::leveling::leveling_curve::{display_level, threshold_label, tier_icon};
use crate::core::leveling::LevelingService;
use crate::discord::nickname_updater::update_nickname;
use crate::infra::leveling::JsonLevelStore;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

/// Type alias for our bot's context.
/// This is what every command receives as its first parameter.
pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Data that's shared across all commands and the event handler.
pub struct Data {
    pub leveling: Arc<LevelingService<JsonLevelStore>>,
}

/// Check that the invoker is a server administrator.
///
/// Sends the ephemeral denial itself, so callers just return when this is `false`.
pub async fn ensure_admin(ctx: Context<'_>) -> Result<bool, Error> {
    let is_admin = ctx
        .author_member()
        .await
        .and_then(|member| member.permissions)
        .is_some_and(|permissions| permissions.administrator());

    if !is_admin {
        ctx.send(
            poise::CreateReply::default()
                .content("You lack admin permissions.")
                .ephemeral(true),
        )
        .await?;
    }

    Ok(is_admin)
}

fn require_guild(ctx: &Context<'_>) -> Result<serenity::GuildId, Error> {
    Ok(ctx.guild_id().ok_or("This command only works in servers")?)
}

/// Check your current level and XP.
#[poise::command(slash_command, guild_only)]
pub async fn rank(
    ctx: Context<'_>,
    #[description = "User to check (defaults to you)"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let target_user = user.as_ref().unwrap_or_else(|| ctx.author());
    let guild_id = require_guild(&ctx)?;

    let record = ctx
        .data()
        .leveling
        .get_user(target_user.id.get(), guild_id.get())
        .await?;

    let embed = serenity::CreateEmbed::new()
        .title(format!("{}'s Rank", target_user.display_name()))
        .color(serenity::Colour::ORANGE)
        .field(
            "Level",
            format!("{} {}", tier_icon(record.level), display_level(record.level)),
            true,
        )
        .field(
            "XP",
            format!("{}/{}", record.xp, threshold_label(record.level)),
            true,
        )
        .thumbnail(target_user.face());

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Increase a member's level by X.
#[poise::command(slash_command, guild_only)]
pub async fn addlevel(
    ctx: Context<'_>,
    #[description = "Member to add levels to"] member: serenity::Member,
    #[description = "Amount to add"] amount: u32,
) -> Result<(), Error> {
    if !ensure_admin(ctx).await? {
        return Ok(());
    }
    let guild_id = require_guild(&ctx)?;

    let record = ctx
        .data()
        .leveling
        .add_levels(member.user.id.get(), guild_id.get(), amount)
        .await?;

    ctx.say(format!("Added {} level(s) to <@{}>!", amount, member.user.id))
        .await?;
    update_nickname(ctx.serenity_context(), guild_id, member.user.id, record.level).await;

    Ok(())
}

/// Decrease a member's level by X.
#[poise::command(slash_command, guild_only)]
pub async fn removelevel(
    ctx: Context<'_>,
    #[description = "Member to remove levels from"] member: serenity::Member,
    #[description = "Amount to remove"] amount: u32,
) -> Result<(), Error> {
    if !ensure_admin(ctx).await? {
        return Ok(());
    }
    let guild_id = require_guild(&ctx)?;

    let record = ctx
        .data()
        .leveling
        .remove_levels(member.user.id.get(), guild_id.get(), amount)
        .await?;

    ctx.say(format!(
        "Removed {} level(s) from <@{}>!",
        amount, member.user.id
    ))
    .await?;
    update_nickname(ctx.serenity_context(), guild_id, member.user.id, record.level).await;

    Ok(())
}

/// Reset a member's level to 1.
#[poise::command(slash_command, guild_only)]
pub async fn resetlevel(
    ctx: Context<'_>,
    #[description = "Member to reset level for"] member: serenity::Member,
) -> Result<(), Error> {
    if !ensure_admin(ctx).await? {
        return Ok(());
    }
    let guild_id = require_guild(&ctx)?;

    let record = ctx
        .data()
        .leveling
        .reset_level(member.user.id.get(), guild_id.get())
        .await?;

    ctx.say(format!("Reset <@{}>'s level to 1!", member.user.id))
        .await?;
    update_nickname(ctx.serenity_context(), guild_id, member.user.id, record.level).await;

    Ok(())
}
