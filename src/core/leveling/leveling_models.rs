// Domain models for the leveling system.
//
// These are the exact shapes written to the levels file, so the serde
// attributes double as the on-disk schema:
// { "<guild_id>": { "users": { "<user_id>": { "xp": 0, "level": 1 } }, "blacklist": [] } }

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A user's XP and level inside one guild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub xp: u64,
    pub level: u32,
}

impl Default for UserRecord {
    /// Everybody starts at level 1 with no XP.
    fn default() -> Self {
        Self { xp: 0, level: 1 }
    }
}

/// Everything we know about a single guild.
///
/// Both fields default to empty so a guild that only ever had a blacklist
/// configured (or only users) still loads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildState {
    #[serde(default)]
    pub users: BTreeMap<u64, UserRecord>,
    /// Channels excluded from XP awards. Kept duplicate-free, in insertion order.
    #[serde(default)]
    pub blacklist: Vec<u64>,
}

impl GuildState {
    /// Get a user's record, creating it at level 1 if it doesn't exist yet.
    pub fn user_mut(&mut self, user_id: u64) -> &mut UserRecord {
        self.users.entry(user_id).or_default()
    }

    pub fn is_blacklisted(&self, channel_id: u64) -> bool {
        self.blacklist.contains(&channel_id)
    }
}

/// The whole persisted document: guild id -> guild state.
///
/// This is the unit of persistence. It is loaded once at startup and
/// rewritten in full after every mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelDocument {
    pub guilds: BTreeMap<u64, GuildState>,
}

impl LevelDocument {
    /// Get a guild's state, creating an empty one on first reference.
    pub fn guild_mut(&mut self, guild_id: u64) -> &mut GuildState {
        self.guilds.entry(guild_id).or_default()
    }

    pub fn guild(&self, guild_id: u64) -> Option<&GuildState> {
        self.guilds.get(&guild_id)
    }
}

/// Returned by the service when a message award pushed a user up a level,
/// so the Discord layer can rename and announce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelUpEvent {
    pub user_id: u64,
    pub guild_id: u64,
    pub old_level: u32,
    pub new_level: u32,
    /// XP left over after the level-up loop (normally 0).
    pub xp: u64,
}
