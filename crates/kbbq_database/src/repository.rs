//! Repository trait implementations backed by a connection pool.

use crate::models::{EmbedRow, NewLevelRoleRow, NewStatusRoleRow, NewWelcomeMessageRow};
use crate::{activity, embeds, leveling, roles, welcome, DatabaseResult, PgPool};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use kbbq_core::{
    ActivityKind, Embed, ExperienceChange, GuildId, LeaderboardOrder, LevelRole,
    MessageComponent, NewLevelRole, NewMessageComponent, NewStatusRole, NewWelcomeMessage, RoleId,
    StatusRole, UserId, UserLevel, WeeklyActivity, WelcomeMessage,
};
use kbbq_error::{DatabaseError, DatabaseErrorKind, KbbqResult};
use kbbq_interface::{
    ActivityRepository, EmbedRepository, LevelRoleRepository, LevelingRepository, RankedActivity,
    RankedLevel, StatusRoleRepository, WelcomeMessageRepository,
};
use tracing::instrument;

/// PostgreSQL implementation of every kbbq repository trait.
///
/// Diesel is synchronous, so each call checks a connection out of the pool
/// and runs on tokio's blocking thread pool.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Create a repository over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn interact<T, F>(&self, f: F) -> KbbqResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> DatabaseResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|e| DatabaseError::new(DatabaseErrorKind::PoolExhausted(e.to_string())))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Worker(e.to_string())))?;
        Ok(result?)
    }
}

#[async_trait]
impl LevelingRepository for PostgresRepository {
    #[instrument(skip(self), fields(guild_id = %guild_id, user_id = %user_id))]
    async fn upsert_experience(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        change: ExperienceChange,
    ) -> KbbqResult<UserLevel> {
        self.interact(move |conn| leveling::upsert_experience(conn, guild_id, user_id, change))
            .await
            .map(Into::into)
    }

    #[instrument(skip(self, user_ids), fields(guild_id = %guild_id, users = user_ids.len()))]
    async fn increment_experience_batch(
        &self,
        guild_id: GuildId,
        user_ids: &[UserId],
        delta: u64,
    ) -> KbbqResult<Vec<UserLevel>> {
        let user_ids = user_ids.to_vec();
        let rows = self
            .interact(move |conn| leveling::increment_batch(conn, guild_id, &user_ids, delta))
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_experience(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> KbbqResult<Option<UserLevel>> {
        let row = self
            .interact(move |conn| leveling::get(conn, guild_id, user_id))
            .await?;
        Ok(row.map(Into::into))
    }

    #[instrument(skip(self), fields(guild_id = %guild_id, user_id = %user_id))]
    async fn set_level(&self, guild_id: GuildId, user_id: UserId, level: u64) -> KbbqResult<()> {
        self.interact(move |conn| leveling::set_level(conn, guild_id, user_id, level))
            .await
    }

    async fn leaderboard(
        &self,
        guild_id: GuildId,
        order: LeaderboardOrder,
        offset: u64,
        limit: u64,
    ) -> KbbqResult<Vec<RankedLevel>> {
        let rows = self
            .interact(move |conn| leveling::leaderboard(conn, guild_id, order, offset, limit))
            .await?;
        Ok(rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| RankedLevel::new(offset + index as u64 + 1, row.into()))
            .collect())
    }

    async fn count_levels(&self, guild_id: GuildId) -> KbbqResult<u64> {
        self.interact(move |conn| leveling::count(conn, guild_id))
            .await
    }

    async fn rank(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        order: LeaderboardOrder,
    ) -> KbbqResult<Option<u64>> {
        self.interact(move |conn| leveling::rank(conn, guild_id, user_id, order))
            .await
    }
}

#[async_trait]
impl ActivityRepository for PostgresRepository {
    #[instrument(skip(self), fields(guild_id = %guild_id, user_id = %user_id))]
    async fn record_activity(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        week: &str,
        kind: ActivityKind,
        amount: u64,
    ) -> KbbqResult<WeeklyActivity> {
        let week = week.to_string();
        self.interact(move |conn| activity::record(conn, guild_id, user_id, &week, kind, amount))
            .await
            .map(Into::into)
    }

    #[instrument(skip(self, user_ids), fields(guild_id = %guild_id, users = user_ids.len()))]
    async fn record_voice_minutes_batch(
        &self,
        guild_id: GuildId,
        user_ids: &[UserId],
        week: &str,
        minutes: u64,
    ) -> KbbqResult<()> {
        let user_ids = user_ids.to_vec();
        let week = week.to_string();
        self.interact(move |conn| {
            activity::record_voice_batch(conn, guild_id, &user_ids, &week, minutes)
        })
        .await
    }

    async fn get_activity(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        week: &str,
    ) -> KbbqResult<Option<WeeklyActivity>> {
        let week = week.to_string();
        let row = self
            .interact(move |conn| activity::get(conn, guild_id, user_id, &week))
            .await?;
        Ok(row.map(Into::into))
    }

    async fn activity_leaderboard(
        &self,
        guild_id: GuildId,
        week: &str,
        kind: ActivityKind,
        offset: u64,
        limit: u64,
    ) -> KbbqResult<Vec<RankedActivity>> {
        let week = week.to_string();
        let rows = self
            .interact(move |conn| activity::leaderboard(conn, guild_id, &week, kind, offset, limit))
            .await?;
        Ok(rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| RankedActivity::new(offset + index as u64 + 1, row.into()))
            .collect())
    }

    async fn count_activity(&self, guild_id: GuildId, week: &str) -> KbbqResult<u64> {
        let week = week.to_string();
        self.interact(move |conn| activity::count(conn, guild_id, &week))
            .await
    }

    async fn activity_rank(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        week: &str,
        kind: ActivityKind,
    ) -> KbbqResult<Option<u64>> {
        let week = week.to_string();
        self.interact(move |conn| activity::rank(conn, guild_id, user_id, &week, kind))
            .await
    }
}

#[async_trait]
impl StatusRoleRepository for PostgresRepository {
    async fn list_status_roles(&self, guild_id: GuildId) -> KbbqResult<Vec<StatusRole>> {
        let rows = self
            .interact(move |conn| roles::list_status_roles(conn, guild_id))
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, role), fields(guild_id = %role.guild_id, role_id = %role.role_id))]
    async fn upsert_status_role(&self, role: NewStatusRole) -> KbbqResult<StatusRole> {
        let row = NewStatusRoleRow::from(role);
        self.interact(move |conn| roles::upsert_status_role(conn, &row))
            .await
            .map(Into::into)
    }

    #[instrument(skip(self), fields(guild_id = %guild_id))]
    async fn delete_status_role(&self, guild_id: GuildId, id: i64) -> KbbqResult<bool> {
        self.interact(move |conn| roles::delete_status_role(conn, guild_id, id))
            .await
    }

    #[instrument(skip(self), fields(guild_id = %guild_id, role_id = %role_id))]
    async fn delete_status_roles_for_role(
        &self,
        guild_id: GuildId,
        role_id: RoleId,
    ) -> KbbqResult<u64> {
        self.interact(move |conn| roles::delete_status_roles_for_role(conn, guild_id, role_id))
            .await
    }
}

#[async_trait]
impl LevelRoleRepository for PostgresRepository {
    async fn list_level_roles(&self, guild_id: GuildId) -> KbbqResult<Vec<LevelRole>> {
        let rows = self
            .interact(move |conn| roles::list_level_roles(conn, guild_id))
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, role), fields(guild_id = %role.guild_id, role_id = %role.role_id))]
    async fn upsert_level_role(&self, role: NewLevelRole) -> KbbqResult<LevelRole> {
        let row = NewLevelRoleRow::from(role);
        self.interact(move |conn| roles::upsert_level_role(conn, &row))
            .await
            .map(Into::into)
    }

    #[instrument(skip(self), fields(guild_id = %guild_id))]
    async fn delete_level_role(&self, guild_id: GuildId, id: i64) -> KbbqResult<bool> {
        self.interact(move |conn| roles::delete_level_role(conn, guild_id, id))
            .await
    }
}

#[async_trait]
impl EmbedRepository for PostgresRepository {
    async fn get_embed(&self, guild_id: GuildId, name: &str) -> KbbqResult<Option<Embed>> {
        let name = name.to_string();
        let row = self
            .interact(move |conn| embeds::get(conn, guild_id, &name))
            .await?;
        Ok(row.map(Into::into))
    }

    #[instrument(skip(self, embed), fields(guild_id = %embed.guild_id, name = %embed.name))]
    async fn upsert_embed(&self, embed: Embed) -> KbbqResult<Embed> {
        let row = EmbedRow::from(embed);
        self.interact(move |conn| embeds::upsert(conn, &row))
            .await
            .map(Into::into)
    }

    #[instrument(skip(self), fields(guild_id = %guild_id))]
    async fn delete_embed(&self, guild_id: GuildId, name: &str) -> KbbqResult<bool> {
        let name = name.to_string();
        self.interact(move |conn| embeds::delete(conn, guild_id, &name))
            .await
    }

    async fn list_embeds(&self, guild_id: GuildId) -> KbbqResult<Vec<Embed>> {
        let rows = self.interact(move |conn| embeds::list(conn, guild_id)).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_components(
        &self,
        guild_id: GuildId,
        embed_name: &str,
    ) -> KbbqResult<Vec<MessageComponent>> {
        let embed_name = embed_name.to_string();
        let rows = self
            .interact(move |conn| embeds::list_components(conn, guild_id, &embed_name))
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, component), fields(guild_id = %component.guild_id, embed = %component.embed_name))]
    async fn add_component(
        &self,
        component: NewMessageComponent,
    ) -> KbbqResult<MessageComponent> {
        self.interact(move |conn| embeds::add_component(conn, component))
            .await
            .map(Into::into)
    }

    #[instrument(skip(self), fields(guild_id = %guild_id))]
    async fn remove_component(&self, guild_id: GuildId, id: i64) -> KbbqResult<bool> {
        self.interact(move |conn| embeds::remove_component(conn, guild_id, id))
            .await
    }
}

#[async_trait]
impl WelcomeMessageRepository for PostgresRepository {
    async fn list_welcome_messages(&self, guild_id: GuildId) -> KbbqResult<Vec<WelcomeMessage>> {
        let rows = self.interact(move |conn| welcome::list(conn, guild_id)).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, message), fields(guild_id = %message.guild_id))]
    async fn create_welcome_message(
        &self,
        message: NewWelcomeMessage,
    ) -> KbbqResult<WelcomeMessage> {
        let row = NewWelcomeMessageRow::from(message);
        self.interact(move |conn| welcome::create(conn, &row))
            .await
            .map(Into::into)
    }

    #[instrument(skip(self), fields(guild_id = %guild_id))]
    async fn delete_welcome_message(&self, guild_id: GuildId, id: i64) -> KbbqResult<bool> {
        self.interact(move |conn| welcome::delete(conn, guild_id, id))
            .await
    }
}
