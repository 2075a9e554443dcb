// The level curve. Pure functions only - no storage, no Discord.

use super::leveling_models::UserRecord;

/// Message awards stop levelling a user once they reach this level.
pub const LEVEL_CAP: u32 = 151;

/// From this level on, levels render as ∞ and thresholds as MAX.
pub const INFINITY_LEVEL: u32 = 150;

/// XP needed to advance out of `level`.
pub fn xp_threshold(level: u32) -> u64 {
    level as u64 * 100
}

/// The glyph shown next to a level in nicknames and rank cards.
pub fn tier_icon(level: u32) -> &'static str {
    if level < 10 {
        "🔥"
    } else if level < 50 {
        "💎"
    } else if level < 100 {
        "🏅"
    } else if level < INFINITY_LEVEL {
        "💯"
    } else {
        "∞"
    }
}

/// The level as users see it: a number, or ∞ from level 150.
pub fn display_level(level: u32) -> String {
    if level < INFINITY_LEVEL {
        level.to_string()
    } else {
        "∞".to_string()
    }
}

/// The right-hand side of an `xp/threshold` display.
pub fn threshold_label(level: u32) -> String {
    if level < INFINITY_LEVEL {
        xp_threshold(level).to_string()
    } else {
        "MAX".to_string()
    }
}

/// Level the record up while it has enough XP for its current threshold.
///
/// Each step resets XP to zero. The `< LEVEL_CAP` guard means a record that
/// reaches 151 stops there and keeps whatever XP the last step left it with.
/// Returns `true` if at least one level-up happened.
pub fn advance(record: &mut UserRecord) -> bool {
    let mut leveled_up = false;
    while record.xp >= xp_threshold(record.level) && record.level < LEVEL_CAP {
        record.level += 1;
        record.xp = 0;
        leveled_up = true;
    }
    leveled_up
}

/// Extra announcement text for the milestone levels.
///
/// Returns `(field name, field value)`.
pub fn milestone_message(level: u32) -> Option<(&'static str, &'static str)> {
    match level {
        10 => Some(("Milestone!", "💎 You’ve hit level 10! Keep it up!")),
        50 => Some(("Milestone!", "🏅 Level 50! You’re unstoppable!")),
        100 => Some(("Milestone!", "💯 Legendary—LEVEL 100!")),
        150 => Some(("Infinity!", "∞ MAX LEVEL! You are a legend!")),
        _ => None,
    }
}
