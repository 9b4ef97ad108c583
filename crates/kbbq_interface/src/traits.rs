//! Repository and platform traits.

use crate::{GuildRole, MemberSnapshot, RankedActivity, RankedLevel};
use async_trait::async_trait;
use kbbq_core::{
    ActivityKind, ChannelId, Embed, ExperienceChange, GuildId, LeaderboardOrder, LevelRole,
    MessageComponent, MessageId, NewLevelRole, NewMessageComponent, NewStatusRole,
    NewWelcomeMessage, RoleId, StatusRole, UserId, UserLevel, WeeklyActivity, WelcomeMessage,
};
use kbbq_error::{KbbqResult, PlatformResult};
use serde_json::Value;
use std::collections::BTreeSet;

/// Per-guild experience counters.
///
/// Every mutation is a single atomic statement at the storage layer; callers
/// never read-modify-write.
#[async_trait]
pub trait LevelingRepository: Send + Sync {
    /// Create the row (level 0) or apply `change` to it. Totals are floored at zero.
    async fn upsert_experience(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        change: ExperienceChange,
    ) -> KbbqResult<UserLevel>;

    /// Add `delta` to every listed user in one transaction.
    async fn increment_experience_batch(
        &self,
        guild_id: GuildId,
        user_ids: &[UserId],
        delta: u64,
    ) -> KbbqResult<Vec<UserLevel>>;

    /// Fetch a user's row.
    async fn get_experience(&self, guild_id: GuildId, user_id: UserId)
    -> KbbqResult<Option<UserLevel>>;

    /// Persist a recomputed level.
    async fn set_level(&self, guild_id: GuildId, user_id: UserId, level: u64) -> KbbqResult<()>;

    /// One page of the guild's leaderboard.
    async fn leaderboard(
        &self,
        guild_id: GuildId,
        order: LeaderboardOrder,
        offset: u64,
        limit: u64,
    ) -> KbbqResult<Vec<RankedLevel>>;

    /// Number of users with experience in the guild.
    async fn count_levels(&self, guild_id: GuildId) -> KbbqResult<u64>;

    /// One-based rank of a user, if they have a row.
    async fn rank(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        order: LeaderboardOrder,
    ) -> KbbqResult<Option<u64>>;
}

/// Weekly message and voice counters keyed by (guild, user, week).
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Add `amount` to one counter, creating the week's row if needed.
    async fn record_activity(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        week: &str,
        kind: ActivityKind,
        amount: u64,
    ) -> KbbqResult<WeeklyActivity>;

    /// Add `minutes` of voice time to every listed user in one transaction.
    async fn record_voice_minutes_batch(
        &self,
        guild_id: GuildId,
        user_ids: &[UserId],
        week: &str,
        minutes: u64,
    ) -> KbbqResult<()>;

    /// Fetch a user's counters for a week.
    async fn get_activity(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        week: &str,
    ) -> KbbqResult<Option<WeeklyActivity>>;

    /// One page of the week's leaderboard for a counter.
    async fn activity_leaderboard(
        &self,
        guild_id: GuildId,
        week: &str,
        kind: ActivityKind,
        offset: u64,
        limit: u64,
    ) -> KbbqResult<Vec<RankedActivity>>;

    /// Number of users active in the guild during a week.
    async fn count_activity(&self, guild_id: GuildId, week: &str) -> KbbqResult<u64>;

    /// One-based rank of a user for a counter in a week.
    async fn activity_rank(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        week: &str,
        kind: ActivityKind,
    ) -> KbbqResult<Option<u64>>;
}

/// Status-role configuration.
#[async_trait]
pub trait StatusRoleRepository: Send + Sync {
    /// All status roles of a guild.
    async fn list_status_roles(&self, guild_id: GuildId) -> KbbqResult<Vec<StatusRole>>;

    /// Insert, or update the announcement of the (guild, role, text) row.
    async fn upsert_status_role(&self, role: NewStatusRole) -> KbbqResult<StatusRole>;

    /// Delete by id; false when nothing matched.
    async fn delete_status_role(&self, guild_id: GuildId, id: i64) -> KbbqResult<bool>;

    /// Delete every status role granting `role_id`; returns the count removed.
    async fn delete_status_roles_for_role(&self, guild_id: GuildId, role_id: RoleId)
    -> KbbqResult<u64>;
}

/// Level-role ladders.
#[async_trait]
pub trait LevelRoleRepository: Send + Sync {
    /// The guild's ladder ordered by required level.
    async fn list_level_roles(&self, guild_id: GuildId) -> KbbqResult<Vec<LevelRole>>;

    /// Insert a rung; an identical rung is returned unchanged.
    async fn upsert_level_role(&self, role: NewLevelRole) -> KbbqResult<LevelRole>;

    /// Delete by id; false when nothing matched.
    async fn delete_level_role(&self, guild_id: GuildId, id: i64) -> KbbqResult<bool>;
}

/// Stored embeds and their link buttons.
#[async_trait]
pub trait EmbedRepository: Send + Sync {
    /// Fetch an embed by name.
    async fn get_embed(&self, guild_id: GuildId, name: &str) -> KbbqResult<Option<Embed>>;

    /// Insert or replace an embed's payload.
    async fn upsert_embed(&self, embed: Embed) -> KbbqResult<Embed>;

    /// Delete an embed and its buttons; false when nothing matched.
    async fn delete_embed(&self, guild_id: GuildId, name: &str) -> KbbqResult<bool>;

    /// All embeds of a guild ordered by name.
    async fn list_embeds(&self, guild_id: GuildId) -> KbbqResult<Vec<Embed>>;

    /// An embed's buttons ordered by position.
    async fn list_components(
        &self,
        guild_id: GuildId,
        embed_name: &str,
    ) -> KbbqResult<Vec<MessageComponent>>;

    /// Append a button after the embed's last one.
    async fn add_component(&self, component: NewMessageComponent)
    -> KbbqResult<MessageComponent>;

    /// Remove a button; later buttons move up one position.
    async fn remove_component(&self, guild_id: GuildId, id: i64) -> KbbqResult<bool>;
}

/// Welcome-message configuration.
#[async_trait]
pub trait WelcomeMessageRepository: Send + Sync {
    /// All welcome messages of a guild.
    async fn list_welcome_messages(&self, guild_id: GuildId) -> KbbqResult<Vec<WelcomeMessage>>;

    /// Insert a welcome message.
    async fn create_welcome_message(&self, message: NewWelcomeMessage)
    -> KbbqResult<WelcomeMessage>;

    /// Delete by id; false when nothing matched.
    async fn delete_welcome_message(&self, guild_id: GuildId, id: i64) -> KbbqResult<bool>;
}

/// Every repository the engines use.
pub trait KbbqRepository:
    LevelingRepository
    + ActivityRepository
    + StatusRoleRepository
    + LevelRoleRepository
    + EmbedRepository
    + WelcomeMessageRepository
{
}

impl<T> KbbqRepository for T where
    T: LevelingRepository
        + ActivityRepository
        + StatusRoleRepository
        + LevelRoleRepository
        + EmbedRepository
        + WelcomeMessageRepository
{
}

/// The platform REST calls the engines make.
///
/// Implementations classify failures into [`kbbq_error::PlatformErrorKind`]
/// so callers can tell expected absence and permission failures apart.
#[async_trait]
pub trait GuildApi: Send + Sync {
    /// Fetch a member.
    async fn member(&self, guild_id: GuildId, user_id: UserId) -> PlatformResult<MemberSnapshot>;

    /// Replace a member's roles in one call; returns the roles they now hold.
    async fn set_member_roles(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        roles: &BTreeSet<RoleId>,
    ) -> PlatformResult<BTreeSet<RoleId>>;

    /// Fetch every role of a guild.
    async fn guild_roles(&self, guild_id: GuildId) -> PlatformResult<Vec<GuildRole>>;

    /// Post a raw create-message body.
    async fn send_message(&self, channel_id: ChannelId, payload: &Value)
    -> PlatformResult<MessageId>;

    /// Delete a message.
    async fn delete_message(&self, channel_id: ChannelId, message_id: MessageId)
    -> PlatformResult<()>;
}
