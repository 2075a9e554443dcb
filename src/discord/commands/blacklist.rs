// XP blacklist management: channels listed here never award XP.

use crate::core::leveling::LevelingError;
use crate::discord::commands::leveling::ensure_admin;
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum BlacklistAction {
    #[name = "list"]
    List,
    #[name = "add"]
    Add,
    #[name = "remove"]
    Remove,
}

/// Manage XP blacklist channels.
#[poise::command(slash_command, guild_only)]
pub async fn blacklist(
    ctx: Context<'_>,
    #[description = "add/remove/list"] subcommand: BlacklistAction,
    #[description = "Channel to add/remove"]
    #[channel_types("Text")]
    channel: Option<serenity::GuildChannel>,
) -> Result<(), Error> {
    if !ensure_admin(ctx).await? {
        return Ok(());
    }
    let guild_id = ctx
        .guild_id()
        .ok_or("This command only works in servers")?
        .get();
    let leveling = &ctx.data().leveling;

    let response = match (subcommand, channel) {
        (BlacklistAction::List, _) => {
            list_message(&leveling.blacklisted_channels(guild_id).await)
        }
        (BlacklistAction::Add, Some(channel)) => {
            match leveling.blacklist_channel(guild_id, channel.id.get()).await {
                Ok(()) => format!("Added <#{}> to blacklist.", channel.id),
                Err(LevelingError::AlreadyBlacklisted(_)) => {
                    format!("<#{}> is already blacklisted.", channel.id)
                }
                Err(e) => return Err(e.into()),
            }
        }
        (BlacklistAction::Remove, Some(channel)) => {
            match leveling.unblacklist_channel(guild_id, channel.id.get()).await {
                Ok(()) => format!("Removed <#{}> from blacklist.", channel.id),
                Err(LevelingError::NotBlacklisted(_)) => {
                    format!("<#{}> is not in blacklist.", channel.id)
                }
                Err(e) => return Err(e.into()),
            }
        }
        (_, None) => "Invalid subcommand or missing channel.".to_string(),
    };

    ctx.send(
        poise::CreateReply::default()
            .content(response)
            .ephemeral(true),
    )
    .await?;

    Ok(())
}

fn list_message(channels: &[u64]) -> String {
    if channels.is_empty() {
        return "No channels blacklisted.".to_string();
    }

    let mentions: Vec<String> = channels.iter().map(|id| format!("<#{}>", id)).collect();
    format!("Blacklisted channels: {}", mentions.join(", "))
}
