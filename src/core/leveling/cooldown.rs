// Per-user XP cooldown. Lives only in memory: a restart clears it.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Tracks when each (guild, user) pair last received XP.
///
/// **DashMap:** events arrive on several tokio worker threads, so the map
/// has to be shareable without wrapping it in another lock.
pub struct CooldownTracker {
    last_award: DashMap<(u64, u64), Instant>,
    cooldown: Duration,
}

impl CooldownTracker {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            last_award: DashMap::new(),
            cooldown,
        }
    }

    /// Returns `true` (and records `now`) if the user may receive XP.
    #[allow(dead_code)]
    pub fn should_award(&self, guild_id: u64, user_id: u64, now: Instant) -> bool {
        self.remaining(guild_id, user_id, now).is_none()
    }

    /// Like [`should_award`](Self::should_award) but reports how long is left
    /// when the user is still throttled.
    pub fn remaining(&self, guild_id: u64, user_id: u64, now: Instant) -> Option<Duration> {
        match self.last_award.entry((guild_id, user_id)) {
            Entry::Vacant(slot) => {
                slot.insert(now);
                None
            }
            Entry::Occupied(mut slot) => {
                let elapsed = now.saturating_duration_since(*slot.get());
                if elapsed >= self.cooldown {
                    slot.insert(now);
                    None
                } else {
                    Some(self.cooldown - elapsed)
                }
            }
        }
    }
}
