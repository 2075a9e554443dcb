// Keeps member nicknames in the "<name> <icon> <level>" format.
//
// Renaming is best-effort: Discord refuses to rename anyone whose top role
// is at or above ours (and the guild owner, always). Failures are logged and
// never reach the user.

use crate::core::leveling::nickname::{compose_nickname, outranks};
use crate::discord::Error;
use poise::serenity_prelude as serenity;

/// Rename `user_id` to show `level`. Never fails; problems are logged.
pub async fn update_nickname(
    ctx: &serenity::Context,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
    level: u32,
) {
    if let Err(e) = try_update_nickname(ctx, guild_id, user_id, level).await {
        tracing::warn!(
            guild_id = guild_id.get(),
            user_id = user_id.get(),
            "Failed to update nickname: {}",
            e
        );
    }
}

async fn try_update_nickname(
    ctx: &serenity::Context,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
    level: u32,
) -> Result<(), Error> {
    let bot_id = ctx.cache.current_user().id;
    let member = guild_id.member(ctx, user_id).await?;
    let bot_member = guild_id.member(ctx, bot_id).await?;

    // Resolve role positions from the cache without holding the guild ref across an await.
    let (bot_top, member_top) = {
        let guild = ctx
            .cache
            .guild(guild_id)
            .ok_or("Guild is not in the cache")?;
        (
            top_role_position(&guild, &bot_member.roles),
            top_role_position(&guild, &member.roles),
        )
    };

    if !outranks(bot_top, member_top) {
        tracing::debug!(
            user_id = user_id.get(),
            bot_top,
            member_top,
            "Skipping nickname update, member's role is not below ours"
        );
        return Ok(());
    }

    let nickname = compose_nickname(&member.user.name, level);
    guild_id
        .edit_member(ctx, user_id, serenity::EditMember::new().nickname(nickname))
        .await?;

    Ok(())
}

/// Position of the highest role in `roles`; 0 (the @everyone position) if none.
fn top_role_position(guild: &serenity::Guild, roles: &[serenity::RoleId]) -> u16 {
    roles
        .iter()
        .filter_map(|id| guild.roles.get(id))
        .map(|role| role.position)
        .max()
        .unwrap_or(0)
}
