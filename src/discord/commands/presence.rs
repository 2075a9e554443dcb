// This module handles bot presence on startup.
//
// Everything here is Discord-layer glue: it only works with Discord SDK types
// (Context, ActivityData, OnlineStatus).

use poise::serenity_prelude as serenity;

/// Called once the bot is ready so members can see what it tracks.
pub fn on_ready(ctx: &serenity::Context) {
    let activity = serenity::ActivityData::watching("XP streaks");
    ctx.set_presence(Some(activity), serenity::OnlineStatus::Online);
}
