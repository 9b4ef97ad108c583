//! In-memory repository.
//!
//! A single mutex guards all state, so every operation is atomic with
//! respect to every other one, matching the guarantees the SQL statements
//! give.

use crate::{
    ActivityRepository, EmbedRepository, LevelRoleRepository, LevelingRepository, RankedActivity,
    RankedLevel, StatusRoleRepository, WelcomeMessageRepository,
};
use async_trait::async_trait;
use kbbq_core::{
    ActivityKind, Embed, ExperienceChange, GuildId, LeaderboardOrder, LevelRole,
    MessageComponent, NewLevelRole, NewMessageComponent, NewStatusRole, NewWelcomeMessage, RoleId,
    StatusRole, UserId, UserLevel, WeeklyActivity, WelcomeMessage,
};
use kbbq_error::{DatabaseError, DatabaseErrorKind, KbbqResult};
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

#[derive(Debug, Default)]
struct State {
    levels: BTreeMap<(GuildId, UserId), UserLevel>,
    activity: BTreeMap<(GuildId, UserId, String), WeeklyActivity>,
    status_roles: Vec<StatusRole>,
    level_roles: Vec<LevelRole>,
    embeds: BTreeMap<(GuildId, String), Embed>,
    components: Vec<MessageComponent>,
    welcome_messages: Vec<WelcomeMessage>,
    unavailable: BTreeSet<GuildId>,
    next_id: i64,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn check(&self, guild_id: GuildId) -> KbbqResult<()> {
        if self.unavailable.contains(&guild_id) {
            return Err(DatabaseError::new(DatabaseErrorKind::Unavailable(format!(
                "guild {guild_id} is unavailable"
            )))
            .into());
        }
        Ok(())
    }

    fn apply(&mut self, guild_id: GuildId, user_id: UserId, change: ExperienceChange) -> UserLevel {
        let row = self
            .levels
            .entry((guild_id, user_id))
            .or_insert_with(|| UserLevel {
                guild_id,
                user_id,
                experience: 0,
                level: 0,
            });
        row.experience = match change {
            ExperienceChange::Increment(delta) => {
                (i128::from(row.experience) + i128::from(delta)).clamp(0, i128::from(u64::MAX))
                    as u64
            }
            ExperienceChange::Set(value) => value,
        };
        row.clone()
    }

    fn sorted_levels(&self, guild_id: GuildId, order: LeaderboardOrder) -> Vec<UserLevel> {
        let mut rows: Vec<UserLevel> = self
            .levels
            .values()
            .filter(|row| row.guild_id == guild_id)
            .cloned()
            .collect();
        match order {
            LeaderboardOrder::Experience => rows.sort_by(|a, b| {
                b.experience
                    .cmp(&a.experience)
                    .then(a.user_id.cmp(&b.user_id))
            }),
            LeaderboardOrder::Level => rows.sort_by(|a, b| {
                b.level
                    .cmp(&a.level)
                    .then(b.experience.cmp(&a.experience))
                    .then(a.user_id.cmp(&b.user_id))
            }),
        }
        rows
    }

    fn sorted_activity(&self, guild_id: GuildId, week: &str, kind: ActivityKind) -> Vec<WeeklyActivity> {
        let mut rows: Vec<WeeklyActivity> = self
            .activity
            .values()
            .filter(|row| row.guild_id == guild_id && row.week == week)
            .cloned()
            .collect();
        let counter = |row: &WeeklyActivity| match kind {
            ActivityKind::Messages => row.messages,
            ActivityKind::Voice => row.minutes_in_voice,
        };
        rows.sort_by(|a, b| counter(b).cmp(&counter(a)).then(a.user_id.cmp(&b.user_id)));
        rows
    }

    fn add_activity(
        &mut self,
        guild_id: GuildId,
        user_id: UserId,
        week: &str,
        kind: ActivityKind,
        amount: u64,
    ) -> WeeklyActivity {
        let row = self
            .activity
            .entry((guild_id, user_id, week.to_string()))
            .or_insert_with(|| WeeklyActivity {
                guild_id,
                user_id,
                week: week.to_string(),
                messages: 0,
                minutes_in_voice: 0,
            });
        match kind {
            ActivityKind::Messages => row.messages = row.messages.saturating_add(amount),
            ActivityKind::Voice => {
                row.minutes_in_voice = row.minutes_in_voice.saturating_add(amount)
            }
        }
        row.clone()
    }
}

/// Process-local implementation of every repository trait.
///
/// Clones share state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<State>>,
}

impl InMemoryRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation on `guild_id` fail as if the store were unreachable.
    pub fn set_unavailable(&self, guild_id: GuildId, unavailable: bool) {
        let mut state = self.state.lock();
        if unavailable {
            state.unavailable.insert(guild_id);
        } else {
            state.unavailable.remove(&guild_id);
        }
    }
}

fn page<T>(rows: Vec<T>, offset: u64, limit: u64) -> impl Iterator<Item = (u64, T)> {
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| (index as u64 + 1, row))
        .skip(offset as usize)
        .take(limit as usize)
}

#[async_trait]
impl LevelingRepository for InMemoryRepository {
    async fn upsert_experience(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        change: ExperienceChange,
    ) -> KbbqResult<UserLevel> {
        let mut state = self.state.lock();
        state.check(guild_id)?;
        Ok(state.apply(guild_id, user_id, change))
    }

    async fn increment_experience_batch(
        &self,
        guild_id: GuildId,
        user_ids: &[UserId],
        delta: u64,
    ) -> KbbqResult<Vec<UserLevel>> {
        let mut state = self.state.lock();
        state.check(guild_id)?;
        let delta = i64::try_from(delta).unwrap_or(i64::MAX);
        Ok(user_ids
            .iter()
            .map(|user_id| state.apply(guild_id, *user_id, ExperienceChange::Increment(delta)))
            .collect())
    }

    async fn get_experience(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> KbbqResult<Option<UserLevel>> {
        let state = self.state.lock();
        state.check(guild_id)?;
        Ok(state.levels.get(&(guild_id, user_id)).cloned())
    }

    async fn set_level(&self, guild_id: GuildId, user_id: UserId, level: u64) -> KbbqResult<()> {
        let mut state = self.state.lock();
        state.check(guild_id)?;
        match state.levels.get_mut(&(guild_id, user_id)) {
            Some(row) => {
                row.level = level;
                Ok(())
            }
            None => Err(DatabaseError::new(DatabaseErrorKind::NotFound).into()),
        }
    }

    async fn leaderboard(
        &self,
        guild_id: GuildId,
        order: LeaderboardOrder,
        offset: u64,
        limit: u64,
    ) -> KbbqResult<Vec<RankedLevel>> {
        let state = self.state.lock();
        state.check(guild_id)?;
        Ok(page(state.sorted_levels(guild_id, order), offset, limit)
            .map(|(rank, row)| RankedLevel::new(rank, row))
            .collect())
    }

    async fn count_levels(&self, guild_id: GuildId) -> KbbqResult<u64> {
        let state = self.state.lock();
        state.check(guild_id)?;
        Ok(state.levels.keys().filter(|(guild, _)| *guild == guild_id).count() as u64)
    }

    async fn rank(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        order: LeaderboardOrder,
    ) -> KbbqResult<Option<u64>> {
        let state = self.state.lock();
        state.check(guild_id)?;
        Ok(state
            .sorted_levels(guild_id, order)
            .iter()
            .position(|row| row.user_id == user_id)
            .map(|index| index as u64 + 1))
    }
}

#[async_trait]
impl ActivityRepository for InMemoryRepository {
    async fn record_activity(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        week: &str,
        kind: ActivityKind,
        amount: u64,
    ) -> KbbqResult<WeeklyActivity> {
        let mut state = self.state.lock();
        state.check(guild_id)?;
        Ok(state.add_activity(guild_id, user_id, week, kind, amount))
    }

    async fn record_voice_minutes_batch(
        &self,
        guild_id: GuildId,
        user_ids: &[UserId],
        week: &str,
        minutes: u64,
    ) -> KbbqResult<()> {
        let mut state = self.state.lock();
        state.check(guild_id)?;
        for user_id in user_ids {
            state.add_activity(guild_id, *user_id, week, ActivityKind::Voice, minutes);
        }
        Ok(())
    }

    async fn get_activity(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        week: &str,
    ) -> KbbqResult<Option<WeeklyActivity>> {
        let state = self.state.lock();
        state.check(guild_id)?;
        Ok(state
            .activity
            .get(&(guild_id, user_id, week.to_string()))
            .cloned())
    }

    async fn activity_leaderboard(
        &self,
        guild_id: GuildId,
        week: &str,
        kind: ActivityKind,
        offset: u64,
        limit: u64,
    ) -> KbbqResult<Vec<RankedActivity>> {
        let state = self.state.lock();
        state.check(guild_id)?;
        Ok(page(state.sorted_activity(guild_id, week, kind), offset, limit)
            .map(|(rank, row)| RankedActivity::new(rank, row))
            .collect())
    }

    async fn count_activity(&self, guild_id: GuildId, week: &str) -> KbbqResult<u64> {
        let state = self.state.lock();
        state.check(guild_id)?;
        Ok(state
            .activity
            .keys()
            .filter(|(guild, _, bucket)| *guild == guild_id && bucket == week)
            .count() as u64)
    }

    async fn activity_rank(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        week: &str,
        kind: ActivityKind,
    ) -> KbbqResult<Option<u64>> {
        let state = self.state.lock();
        state.check(guild_id)?;
        Ok(state
            .sorted_activity(guild_id, week, kind)
            .iter()
            .position(|row| row.user_id == user_id)
            .map(|index| index as u64 + 1))
    }
}

#[async_trait]
impl StatusRoleRepository for InMemoryRepository {
    async fn list_status_roles(&self, guild_id: GuildId) -> KbbqResult<Vec<StatusRole>> {
        let state = self.state.lock();
        state.check(guild_id)?;
        Ok(state
            .status_roles
            .iter()
            .filter(|role| role.guild_id == guild_id)
            .cloned()
            .collect())
    }

    async fn upsert_status_role(&self, role: NewStatusRole) -> KbbqResult<StatusRole> {
        let mut state = self.state.lock();
        state.check(role.guild_id)?;
        if let Some(existing) = state.status_roles.iter_mut().find(|existing| {
            existing.guild_id == role.guild_id
                && existing.role_id == role.role_id
                && existing.required_text == role.required_text
        }) {
            existing.embed_name = role.embed_name;
            existing.channel_id = role.channel_id;
            return Ok(existing.clone());
        }
        let created = StatusRole {
            id: state.next_id(),
            guild_id: role.guild_id,
            role_id: role.role_id,
            required_text: role.required_text,
            embed_name: role.embed_name,
            channel_id: role.channel_id,
        };
        state.status_roles.push(created.clone());
        Ok(created)
    }

    async fn delete_status_role(&self, guild_id: GuildId, id: i64) -> KbbqResult<bool> {
        let mut state = self.state.lock();
        state.check(guild_id)?;
        let before = state.status_roles.len();
        state
            .status_roles
            .retain(|role| !(role.guild_id == guild_id && role.id == id));
        Ok(state.status_roles.len() != before)
    }

    async fn delete_status_roles_for_role(
        &self,
        guild_id: GuildId,
        role_id: RoleId,
    ) -> KbbqResult<u64> {
        let mut state = self.state.lock();
        state.check(guild_id)?;
        let before = state.status_roles.len();
        state
            .status_roles
            .retain(|role| !(role.guild_id == guild_id && role.role_id == role_id));
        Ok((before - state.status_roles.len()) as u64)
    }
}

#[async_trait]
impl LevelRoleRepository for InMemoryRepository {
    async fn list_level_roles(&self, guild_id: GuildId) -> KbbqResult<Vec<LevelRole>> {
        let state = self.state.lock();
        state.check(guild_id)?;
        let mut ladder: Vec<LevelRole> = state
            .level_roles
            .iter()
            .filter(|role| role.guild_id == guild_id)
            .cloned()
            .collect();
        ladder.sort_by_key(|role| (role.required_level, role.id));
        Ok(ladder)
    }

    async fn upsert_level_role(&self, role: NewLevelRole) -> KbbqResult<LevelRole> {
        let mut state = self.state.lock();
        state.check(role.guild_id)?;
        if let Some(existing) = state.level_roles.iter().find(|existing| {
            existing.guild_id == role.guild_id
                && existing.role_id == role.role_id
                && existing.required_level == role.required_level
        }) {
            return Ok(existing.clone());
        }
        let created = LevelRole {
            id: state.next_id(),
            guild_id: role.guild_id,
            role_id: role.role_id,
            required_level: role.required_level,
        };
        state.level_roles.push(created.clone());
        Ok(created)
    }

    async fn delete_level_role(&self, guild_id: GuildId, id: i64) -> KbbqResult<bool> {
        let mut state = self.state.lock();
        state.check(guild_id)?;
        let before = state.level_roles.len();
        state
            .level_roles
            .retain(|role| !(role.guild_id == guild_id && role.id == id));
        Ok(state.level_roles.len() != before)
    }
}

#[async_trait]
impl EmbedRepository for InMemoryRepository {
    async fn get_embed(&self, guild_id: GuildId, name: &str) -> KbbqResult<Option<Embed>> {
        let state = self.state.lock();
        state.check(guild_id)?;
        Ok(state.embeds.get(&(guild_id, name.to_string())).cloned())
    }

    async fn upsert_embed(&self, embed: Embed) -> KbbqResult<Embed> {
        let mut state = self.state.lock();
        state.check(embed.guild_id)?;
        state
            .embeds
            .insert((embed.guild_id, embed.name.clone()), embed.clone());
        Ok(embed)
    }

    async fn delete_embed(&self, guild_id: GuildId, name: &str) -> KbbqResult<bool> {
        let mut state = self.state.lock();
        state.check(guild_id)?;
        let removed = state.embeds.remove(&(guild_id, name.to_string())).is_some();
        state
            .components
            .retain(|component| !(component.guild_id == guild_id && component.embed_name == name));
        Ok(removed)
    }

    async fn list_embeds(&self, guild_id: GuildId) -> KbbqResult<Vec<Embed>> {
        let state = self.state.lock();
        state.check(guild_id)?;
        Ok(state
            .embeds
            .values()
            .filter(|embed| embed.guild_id == guild_id)
            .cloned()
            .collect())
    }

    async fn list_components(
        &self,
        guild_id: GuildId,
        embed_name: &str,
    ) -> KbbqResult<Vec<MessageComponent>> {
        let state = self.state.lock();
        state.check(guild_id)?;
        let mut components: Vec<MessageComponent> = state
            .components
            .iter()
            .filter(|component| component.guild_id == guild_id && component.embed_name == embed_name)
            .cloned()
            .collect();
        components.sort_by_key(|component| component.position);
        Ok(components)
    }

    async fn add_component(&self, component: NewMessageComponent) -> KbbqResult<MessageComponent> {
        let mut state = self.state.lock();
        state.check(component.guild_id)?;
        let position = state
            .components
            .iter()
            .filter(|existing| {
                existing.guild_id == component.guild_id
                    && existing.embed_name == component.embed_name
            })
            .count() as u32;
        let created = MessageComponent {
            id: state.next_id(),
            guild_id: component.guild_id,
            embed_name: component.embed_name,
            position,
            label: component.label,
            url: component.url,
            emoji: component.emoji,
        };
        state.components.push(created.clone());
        Ok(created)
    }

    async fn remove_component(&self, guild_id: GuildId, id: i64) -> KbbqResult<bool> {
        let mut state = self.state.lock();
        state.check(guild_id)?;
        let Some(index) = state
            .components
            .iter()
            .position(|component| component.guild_id == guild_id && component.id == id)
        else {
            return Ok(false);
        };
        let removed = state.components.remove(index);
        for component in state.components.iter_mut().filter(|component| {
            component.guild_id == guild_id
                && component.embed_name == removed.embed_name
                && component.position > removed.position
        }) {
            component.position -= 1;
        }
        Ok(true)
    }
}

#[async_trait]
impl WelcomeMessageRepository for InMemoryRepository {
    async fn list_welcome_messages(&self, guild_id: GuildId) -> KbbqResult<Vec<WelcomeMessage>> {
        let state = self.state.lock();
        state.check(guild_id)?;
        Ok(state
            .welcome_messages
            .iter()
            .filter(|message| message.guild_id == guild_id)
            .cloned()
            .collect())
    }

    async fn create_welcome_message(
        &self,
        message: NewWelcomeMessage,
    ) -> KbbqResult<WelcomeMessage> {
        let mut state = self.state.lock();
        state.check(message.guild_id)?;
        let created = WelcomeMessage {
            id: state.next_id(),
            guild_id: message.guild_id,
            channel_id: message.channel_id,
            embed_name: message.embed_name,
            expiry_secs: message.expiry_secs,
        };
        state.welcome_messages.push(created.clone());
        Ok(created)
    }

    async fn delete_welcome_message(&self, guild_id: GuildId, id: i64) -> KbbqResult<bool> {
        let mut state = self.state.lock();
        state.check(guild_id)?;
        let before = state.welcome_messages.len();
        state
            .welcome_messages
            .retain(|message| !(message.guild_id == guild_id && message.id == id));
        Ok(state.welcome_messages.len() != before)
    }
}
