// This is the leveling service - it contains ALL the business logic for the leveling system.
// Notice how this module has NO Discord-specific code (no serenity, no poise imports).
// It works with primitive ids (u64) so the Discord layer only has to translate.

use super::cooldown::CooldownTracker;
use super::leveling_curve::advance;
use super::leveling_models::{LevelDocument, LevelUpEvent, UserRecord};
use super::leveling_store::{LevelStore, StoreError};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum LevelingError {
    #[error("User is on cooldown. Time remaining: {0:?}")]
    OnCooldown(Duration),

    #[error("Channel {0} is blacklisted for XP")]
    ChannelBlacklisted(u64),

    #[error("Channel {0} is already blacklisted")]
    AlreadyBlacklisted(u64),

    #[error("Channel {0} is not in the blacklist")]
    NotBlacklisted(u64),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Invalid user or guild ID")]
    InvalidId,
}

// ============================================================================
// CORE SERVICE
// ============================================================================

/// The main service for leveling operations.
///
/// Owns the in-memory document (the single source of truth while the bot
/// runs), the cooldown map and the store used to persist the document.
///
/// **Why a Mutex around the whole document?**
/// Serenity hands events to a multi-threaded runtime, so two messages can be
/// processed at the same time. Every operation holds the lock across
/// load -> mutate -> save so there is only ever one writer.
pub struct LevelingService<S: LevelStore> {
    store: S,
    document: Mutex<LevelDocument>,
    cooldowns: CooldownTracker,
    xp_per_message: u64,
}

impl<S: LevelStore> LevelingService<S> {
    /// Load the persisted document and build the service around it.
    pub async fn new(store: S) -> Result<Self, LevelingError> {
        let document = store.load().await?;
        tracing::info!(guilds = document.guilds.len(), "Loaded leveling data");

        Ok(Self {
            store,
            document: Mutex::new(document),
            cooldowns: CooldownTracker::new(Duration::from_secs(60)),
            xp_per_message: 10,
        })
    }

    fn validate_ids(user_id: u64, guild_id: u64) -> Result<(), LevelingError> {
        if user_id == 0 || guild_id == 0 {
            Err(LevelingError::InvalidId)
        } else {
            Ok(())
        }
    }

    /// Process a message and potentially award XP.
    ///
    /// **Returns:**
    /// - `Ok(Some(LevelUpEvent))` if the user leveled up
    /// - `Ok(None)` if XP was awarded but no level up occurred
    /// - `Err(LevelingError::ChannelBlacklisted)` if the channel earns no XP
    /// - `Err(LevelingError::OnCooldown)` if the user is on cooldown
    /// - `Err(...)` for storage errors
    pub async fn process_message(
        &self,
        user_id: u64,
        guild_id: u64,
        channel_id: u64,
    ) -> Result<Option<LevelUpEvent>, LevelingError> {
        self.process_message_at(user_id, guild_id, channel_id, Instant::now())
            .await
    }

    /// [`process_message`](Self::process_message) with an explicit clock.
    pub async fn process_message_at(
        &self,
        user_id: u64,
        guild_id: u64,
        channel_id: u64,
        now: Instant,
    ) -> Result<Option<LevelUpEvent>, LevelingError> {
        Self::validate_ids(user_id, guild_id)?;

        let mut document = self.document.lock().await;

        // 1. Blacklisted channels never award anything
        if document
            .guild(guild_id)
            .is_some_and(|guild| guild.is_blacklisted(channel_id))
        {
            return Err(LevelingError::ChannelBlacklisted(channel_id));
        }

        // 2. Make sure the user exists before the cooldown check
        document.guild_mut(guild_id).user_mut(user_id);

        // 3. Check cooldown
        if let Some(remaining) = self.cooldowns.remaining(guild_id, user_id, now) {
            return Err(LevelingError::OnCooldown(remaining));
        }

        // 4. Award XP and run the level-up loop
        let record = document.guild_mut(guild_id).user_mut(user_id);
        let old_level = record.level;
        record.xp = record.xp.saturating_add(self.xp_per_message);
        let leveled_up = advance(record);
        let record = *record;

        // 5. Persist regardless of whether anything levelled
        self.store.save(&document).await?;

        if leveled_up {
            Ok(Some(LevelUpEvent {
                user_id,
                guild_id,
                old_level,
                new_level: record.level,
                xp: record.xp,
            }))
        } else {
            Ok(None)
        }
    }

    /// Get a user's record, creating it at level 1 if needed.
    ///
    /// Creation only touches memory; it is written out with the next save.
    pub async fn get_user(&self, user_id: u64, guild_id: u64) -> Result<UserRecord, LevelingError> {
        Self::validate_ids(user_id, guild_id)?;

        let mut document = self.document.lock().await;
        Ok(*document.guild_mut(guild_id).user_mut(user_id))
    }

    /// Raise a user's level by `amount`. There is no upper clamp.
    pub async fn add_levels(
        &self,
        user_id: u64,
        guild_id: u64,
        amount: u32,
    ) -> Result<UserRecord, LevelingError> {
        self.update_user(user_id, guild_id, |record| {
            record.level = record.level.saturating_add(amount);
        })
        .await
    }

    /// Lower a user's level by `amount`, never going below level 1.
    pub async fn remove_levels(
        &self,
        user_id: u64,
        guild_id: u64,
        amount: u32,
    ) -> Result<UserRecord, LevelingError> {
        self.update_user(user_id, guild_id, |record| {
            record.level = record.level.saturating_sub(amount).max(1);
        })
        .await
    }

    /// Put a user back at level 1 with no XP.
    pub async fn reset_level(
        &self,
        user_id: u64,
        guild_id: u64,
    ) -> Result<UserRecord, LevelingError> {
        self.update_user(user_id, guild_id, |record| {
            *record = UserRecord::default();
        })
        .await
    }

    async fn update_user(
        &self,
        user_id: u64,
        guild_id: u64,
        apply: impl FnOnce(&mut UserRecord),
    ) -> Result<UserRecord, LevelingError> {
        Self::validate_ids(user_id, guild_id)?;

        let mut document = self.document.lock().await;
        let record = document.guild_mut(guild_id).user_mut(user_id);
        apply(record);
        let record = *record;
        self.store.save(&document).await?;
        Ok(record)
    }

    /// Channels in the guild that don't earn XP, in the order they were added.
    pub async fn blacklisted_channels(&self, guild_id: u64) -> Vec<u64> {
        let document = self.document.lock().await;
        document
            .guild(guild_id)
            .map(|guild| guild.blacklist.clone())
            .unwrap_or_default()
    }

    /// Stop a channel from earning XP.
    pub async fn blacklist_channel(
        &self,
        guild_id: u64,
        channel_id: u64,
    ) -> Result<(), LevelingError> {
        let mut document = self.document.lock().await;
        let guild = document.guild_mut(guild_id);
        if guild.is_blacklisted(channel_id) {
            return Err(LevelingError::AlreadyBlacklisted(channel_id));
        }

        guild.blacklist.push(channel_id);
        self.store.save(&document).await?;
        Ok(())
    }

    /// Let a blacklisted channel earn XP again.
    pub async fn unblacklist_channel(
        &self,
        guild_id: u64,
        channel_id: u64,
    ) -> Result<(), LevelingError> {
        let mut document = self.document.lock().await;
        let guild = document.guild_mut(guild_id);
        let Some(index) = guild.blacklist.iter().position(|id| *id == channel_id) else {
            return Err(LevelingError::NotBlacklisted(channel_id));
        };

        guild.blacklist.remove(index);
        self.store.save(&document).await?;
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::leveling::GuildState;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const GUILD: u64 = 10;
    const USER: u64 = 20;
    const CHANNEL: u64 = 30;

    /// Keeps the last saved document in memory and counts saves.
    #[derive(Default)]
    struct MemoryStore {
        initial: LevelDocument,
        saved: std::sync::Mutex<Option<LevelDocument>>,
        saves: Arc<AtomicUsize>,
    }

    impl MemoryStore {
        fn with(initial: LevelDocument) -> Self {
            Self {
                initial,
                ..Default::default()
            }
        }

        fn last_saved(&self) -> Option<LevelDocument> {
            self.saved.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LevelStore for MemoryStore {
        async fn load(&self) -> Result<LevelDocument, StoreError> {
            Ok(self.initial.clone())
        }

        async fn save(&self, document: &LevelDocument) -> Result<(), StoreError> {
            *self.saved.lock().unwrap() = Some(document.clone());
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn seeded(record: UserRecord) -> LevelDocument {
        let mut document = LevelDocument::default();
        document.guilds.insert(
            GUILD,
            GuildState {
                users: [(USER, record)].into_iter().collect(),
                blacklist: Vec::new(),
            },
        );
        document
    }

    async fn make_service(document: LevelDocument) -> LevelingService<MemoryStore> {
        LevelingService::new(MemoryStore::with(document)).await.unwrap()
    }

    fn saves(service: &LevelingService<MemoryStore>) -> usize {
        service.store.saves.load(Ordering::SeqCst)
    }

    #[tokio::test]
    async fn first_message_awards_ten_xp_without_level_up() {
        let service = make_service(LevelDocument::default()).await;

        let result = service
            .process_message(USER, GUILD, CHANNEL)
            .await
            .unwrap();

        assert!(result.is_none());
        let saved = service.store.last_saved().unwrap();
        assert_eq!(
            saved.guild(GUILD).unwrap().users[&USER],
            UserRecord { xp: 10, level: 1 }
        );
    }

    #[tokio::test]
    async fn second_message_inside_cooldown_is_a_no_op() {
        let service = make_service(LevelDocument::default()).await;
        let start = Instant::now();

        service
            .process_message_at(USER, GUILD, CHANNEL, start)
            .await
            .unwrap();
        let err = service
            .process_message_at(USER, GUILD, CHANNEL, start + Duration::from_secs(30))
            .await
            .unwrap_err();

        assert!(matches!(err, LevelingError::OnCooldown(_)));
        assert_eq!(saves(&service), 1);
        assert_eq!(
            service.get_user(USER, GUILD).await.unwrap(),
            UserRecord { xp: 10, level: 1 }
        );
    }

    #[tokio::test]
    async fn message_after_cooldown_counts_again() {
        let service = make_service(LevelDocument::default()).await;
        let start = Instant::now();

        for minute in 0..3 {
            service
                .process_message_at(USER, GUILD, CHANNEL, start + Duration::from_secs(60 * minute))
                .await
                .unwrap();
        }

        assert_eq!(service.get_user(USER, GUILD).await.unwrap().xp, 30);
        assert_eq!(saves(&service), 3);
    }

    #[tokio::test]
    async fn crossing_threshold_reports_level_up() {
        let service = make_service(seeded(UserRecord { xp: 90, level: 1 })).await;

        let level_up = service
            .process_message(USER, GUILD, CHANNEL)
            .await
            .unwrap()
            .expect("should level up");

        assert_eq!(
            level_up,
            LevelUpEvent {
                user_id: USER,
                guild_id: GUILD,
                old_level: 1,
                new_level: 2,
                xp: 0,
            }
        );
    }

    #[tokio::test]
    async fn cap_transition_keeps_literal_behaviour() {
        let service = make_service(seeded(UserRecord {
            xp: 14_990,
            level: 150,
        }))
        .await;
        let start = Instant::now();

        let level_up = service
            .process_message_at(USER, GUILD, CHANNEL, start)
            .await
            .unwrap()
            .expect("150 -> 151");
        assert_eq!(level_up.new_level, 151);
        assert_eq!(level_up.xp, 0);

        let next = service
            .process_message_at(USER, GUILD, CHANNEL, start + Duration::from_secs(60))
            .await
            .unwrap();
        assert!(next.is_none());
        assert_eq!(
            service.get_user(USER, GUILD).await.unwrap(),
            UserRecord { xp: 10, level: 151 }
        );
    }

    #[tokio::test]
    async fn blacklisted_channel_never_awards() {
        let service = make_service(LevelDocument::default()).await;
        service.blacklist_channel(GUILD, CHANNEL).await.unwrap();
        let start = Instant::now();

        for minute in 0..3 {
            let err = service
                .process_message_at(USER, GUILD, CHANNEL, start + Duration::from_secs(120 * minute))
                .await
                .unwrap_err();
            assert!(matches!(err, LevelingError::ChannelBlacklisted(CHANNEL)));
        }

        let saved = service.store.last_saved().unwrap();
        assert!(saved.guild(GUILD).unwrap().users.is_empty());

        // Other channels still work.
        service
            .process_message_at(USER, GUILD, CHANNEL + 1, start)
            .await
            .unwrap();
        assert_eq!(service.get_user(USER, GUILD).await.unwrap().xp, 10);
    }

    #[tokio::test]
    async fn remove_levels_clamps_at_one() {
        let service = make_service(seeded(UserRecord { xp: 40, level: 3 })).await;

        let record = service.remove_levels(USER, GUILD, 10).await.unwrap();

        assert_eq!(record, UserRecord { xp: 40, level: 1 });
        assert_eq!(saves(&service), 1);
    }

    #[tokio::test]
    async fn add_levels_has_no_upper_clamp() {
        let service = make_service(seeded(UserRecord { xp: 0, level: 150 })).await;

        let record = service.add_levels(USER, GUILD, 10).await.unwrap();

        assert_eq!(record.level, 160);
        let saved = service.store.last_saved().unwrap();
        assert_eq!(saved.guild(GUILD).unwrap().users[&USER].level, 160);
    }

    #[tokio::test]
    async fn reset_level_clears_xp_too() {
        let service = make_service(seeded(UserRecord { xp: 75, level: 42 })).await;

        let record = service.reset_level(USER, GUILD).await.unwrap();

        assert_eq!(record, UserRecord::default());
    }

    #[tokio::test]
    async fn rank_lookup_creates_record_without_saving() {
        let service = make_service(LevelDocument::default()).await;

        let record = service.get_user(USER, GUILD).await.unwrap();

        assert_eq!(record, UserRecord::default());
        assert_eq!(saves(&service), 0);
    }

    #[tokio::test]
    async fn blacklist_add_is_idempotent() {
        let service = make_service(LevelDocument::default()).await;

        service.blacklist_channel(GUILD, CHANNEL).await.unwrap();
        let err = service.blacklist_channel(GUILD, CHANNEL).await.unwrap_err();

        assert!(matches!(err, LevelingError::AlreadyBlacklisted(CHANNEL)));
        assert_eq!(service.blacklisted_channels(GUILD).await, vec![CHANNEL]);
        assert_eq!(saves(&service), 1);
    }

    #[tokio::test]
    async fn unblacklist_reports_missing_channel() {
        let service = make_service(LevelDocument::default()).await;
        service.blacklist_channel(GUILD, 1).await.unwrap();
        service.blacklist_channel(GUILD, 2).await.unwrap();

        service.unblacklist_channel(GUILD, 1).await.unwrap();
        let err = service.unblacklist_channel(GUILD, 1).await.unwrap_err();

        assert!(matches!(err, LevelingError::NotBlacklisted(1)));
        assert_eq!(service.blacklisted_channels(GUILD).await, vec![2]);
        assert_eq!(saves(&service), 3);
    }

    #[tokio::test]
    async fn zero_ids_are_rejected() {
        let service = make_service(LevelDocument::default()).await;

        let err = service.process_message(0, GUILD, CHANNEL).await.unwrap_err();

        assert_eq!(err.to_string(), "Invalid user or guild ID");
    }
}
