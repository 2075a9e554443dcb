use crate::core::leveling::leveling_curve::{
    display_level, milestone_message, threshold_label, tier_icon,
};
use crate::core::leveling::LevelUpEvent;
use poise::serenity_prelude::{self as serenity, builder::CreateMessage};

/// Post the level-up embed in the channel the message came from.
pub async fn send_level_up_embed(
    ctx: &serenity::Context,
    message: &serenity::Message,
    level_up: &LevelUpEvent,
) -> Result<(), serenity::Error> {
    let level = level_up.new_level;

    let mut embed = serenity::CreateEmbed::new()
        .title("🚀 LEVEL UP!")
        .description(level_up_description(level_up))
        .color(serenity::Colour::GOLD)
        .field(
            "Current XP",
            format!("{}/{}", level_up.xp, threshold_label(level)),
            true,
        )
        .thumbnail(message.author.face());

    if let Some((name, value)) = milestone_message(level) {
        embed = embed.field(name, value, false);
    }

    message
        .channel_id
        .send_message(ctx, CreateMessage::new().embed(embed))
        .await
        .map(|_| ())
}

fn level_up_description(level_up: &LevelUpEvent) -> String {
    format!(
        "<@{}> reached level {} **{}**!",
        level_up.user_id,
        tier_icon(level_up.new_level),
        display_level(level_up.new_level)
    )
}
