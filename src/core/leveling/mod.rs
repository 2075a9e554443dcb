// Leveling feature: XP awards, the level curve, cooldowns and per-guild
// blacklists. Nothing in here knows about serenity or poise.

pub mod cooldown;
pub mod leveling_curve;
pub mod leveling_models;
pub mod leveling_service;
pub mod leveling_store;
pub mod nickname;

pub use leveling_models::{GuildState, LevelDocument, LevelUpEvent, UserRecord};
pub use leveling_service::{LevelingError, LevelingService};
pub use leveling_store::{LevelStore, StoreError};
