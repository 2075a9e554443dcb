// Awards XP for guild messages and reacts to level-ups.

use crate::core::leveling::LevelingError;
use crate::discord::leveling_announcements::send_level_up_embed;
use crate::discord::nickname_updater::update_nickname;
use crate::discord::Data;
use poise::serenity_prelude as serenity;

/// Called for every message the gateway delivers.
///
/// Bot authors and DMs are ignored. Blacklisted channels and users on
/// cooldown are silent no-ops; anything else that goes wrong is logged.
pub async fn handle_message(ctx: &serenity::Context, message: &serenity::Message, data: &Data) {
    // Ignore bot messages (including our own)
    if message.author.bot {
        return;
    }

    // Only process guild messages (not DMs)
    let Some(guild_id) = message.guild_id else {
        return;
    };

    let result = data
        .leveling
        .process_message(
            message.author.id.get(),
            guild_id.get(),
            message.channel_id.get(),
        )
        .await;

    match result {
        Ok(Some(level_up)) => {
            tracing::info!(
                user_id = level_up.user_id,
                guild_id = level_up.guild_id,
                old_level = level_up.old_level,
                new_level = level_up.new_level,
                "User leveled up"
            );

            update_nickname(ctx, guild_id, message.author.id, level_up.new_level).await;

            if let Err(err) = send_level_up_embed(ctx, message, &level_up).await {
                tracing::warn!("Failed to send level-up embed: {err}");
            }
        }
        Ok(None) => {
            // XP was awarded but no level up - nothing to do
        }
        Err(LevelingError::OnCooldown(_)) | Err(LevelingError::ChannelBlacklisted(_)) => {}
        Err(e) => {
            tracing::error!("Error processing XP for message: {}", e);
        }
    }
}
