// Nickname composition for the "<name> <icon> <level>" display.
//
// Discord caps nicknames at 32 characters, so long usernames get cut down
// to leave room for the icon and level.

use super::leveling_curve::{display_level, tier_icon};

pub const MAX_NICKNAME_LEN: usize = 32;

/// Build the nickname for a member at `level`, truncating `base_name` if needed.
pub fn compose_nickname(base_name: &str, level: u32) -> String {
    let icon = tier_icon(level);
    let shown_level = display_level(level);
    let candidate = format!("{} {} {}", base_name, icon, shown_level);
    if candidate.chars().count() <= MAX_NICKNAME_LEN {
        return candidate;
    }

    // Two separators plus the icon and level text.
    let reserved = icon.chars().count() + shown_level.chars().count() + 2;
    let keep = MAX_NICKNAME_LEN.saturating_sub(reserved);
    let truncated: String = base_name.chars().take(keep).collect();
    format!("{} {} {}", truncated, icon, shown_level)
}

/// Discord only lets us rename members whose top role sits strictly below ours.
pub fn outranks(bot_top_position: u16, member_top_position: u16) -> bool {
    bot_top_position > member_top_position
}
