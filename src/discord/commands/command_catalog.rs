// Discord commands module.
// Each feature gets its own command file.

pub mod blacklist;

pub mod leveling;

pub mod presence;

use crate::discord::{Data, Error};

/// Every slash command the bot registers.
pub fn all() -> Vec<poise::Command<Data, Error>> {
    vec![
        leveling::rank(),
        leveling::addlevel(),
        leveling::removelevel(),
        leveling::resetlevel(),
        blacklist::blacklist(),
    ]
}
