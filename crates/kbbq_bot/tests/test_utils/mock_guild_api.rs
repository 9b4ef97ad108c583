//! Recording platform API for engine tests.

use async_trait::async_trait;
use kbbq_core::{ChannelId, GuildId, MessageId, RoleId, UserId};
use kbbq_error::{PlatformError, PlatformErrorKind, PlatformResult};
use kbbq_interface::{GuildApi, GuildRole, MemberSnapshot};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

/// A role-replacement call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleEdit {
    pub guild_id: GuildId,
    pub user_id: UserId,
    pub roles: BTreeSet<RoleId>,
}

/// A posted message.
#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub payload: Value,
}

#[derive(Default)]
struct State {
    members: HashMap<(GuildId, UserId), MemberSnapshot>,
    roles: HashMap<GuildId, Vec<GuildRole>>,
    role_edits: Vec<RoleEdit>,
    sent: Vec<SentMessage>,
    deleted: Vec<(ChannelId, MessageId)>,
    role_fetches: usize,
    role_edit_error: Option<PlatformErrorKind>,
    send_error: Option<PlatformErrorKind>,
    next_message: u64,
}

/// In-memory guild with call recording.
#[derive(Default)]
pub struct MockGuildApi {
    state: Mutex<State>,
}

impl MockGuildApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member holding `roles`.
    pub fn add_member(&self, guild_id: GuildId, user_id: UserId, roles: &[RoleId]) {
        let member = member(user_id, roles);
        self.state
            .lock()
            .unwrap()
            .members
            .insert((guild_id, user_id), member);
    }

    /// Define the guild's roles.
    pub fn set_roles(&self, guild_id: GuildId, roles: &[RoleId]) {
        let roles = roles
            .iter()
            .enumerate()
            .map(|(position, id)| GuildRole::new(*id, format!("role-{id}"), position as u16))
            .collect();
        self.state.lock().unwrap().roles.insert(guild_id, roles);
    }

    /// Make every role edit fail with `kind`.
    pub fn fail_role_edits(&self, kind: PlatformErrorKind) {
        self.state.lock().unwrap().role_edit_error = Some(kind);
    }

    /// Make every message send fail with `kind`.
    pub fn fail_sends(&self, kind: PlatformErrorKind) {
        self.state.lock().unwrap().send_error = Some(kind);
    }

    pub fn member_roles(&self, guild_id: GuildId, user_id: UserId) -> BTreeSet<RoleId> {
        self.state
            .lock()
            .unwrap()
            .members
            .get(&(guild_id, user_id))
            .map(|member| member.roles.clone())
            .unwrap_or_default()
    }

    pub fn role_edits(&self) -> Vec<RoleEdit> {
        self.state.lock().unwrap().role_edits.clone()
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn deleted(&self) -> Vec<(ChannelId, MessageId)> {
        self.state.lock().unwrap().deleted.clone()
    }

    pub fn role_fetches(&self) -> usize {
        self.state.lock().unwrap().role_fetches
    }
}

/// A member with a legacy tag and no avatar.
pub fn member(user_id: UserId, roles: &[RoleId]) -> MemberSnapshot {
    MemberSnapshot::new(
        user_id,
        format!("user{user_id}"),
        Some(1),
        None,
        None,
        roles.iter().copied().collect(),
    )
}

#[async_trait]
impl GuildApi for MockGuildApi {
    async fn member(&self, guild_id: GuildId, user_id: UserId) -> PlatformResult<MemberSnapshot> {
        self.state
            .lock()
            .unwrap()
            .members
            .get(&(guild_id, user_id))
            .cloned()
            .ok_or_else(|| PlatformError::new(PlatformErrorKind::UnknownMember))
    }

    async fn set_member_roles(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        roles: &BTreeSet<RoleId>,
    ) -> PlatformResult<BTreeSet<RoleId>> {
        let mut state = self.state.lock().unwrap();
        if let Some(kind) = state.role_edit_error.clone() {
            return Err(PlatformError::new(kind));
        }
        state.role_edits.push(RoleEdit {
            guild_id,
            user_id,
            roles: roles.clone(),
        });
        let member = state
            .members
            .get_mut(&(guild_id, user_id))
            .ok_or_else(|| PlatformError::new(PlatformErrorKind::UnknownMember))?;
        member.roles = roles.clone();
        Ok(roles.clone())
    }

    async fn guild_roles(&self, guild_id: GuildId) -> PlatformResult<Vec<GuildRole>> {
        let mut state = self.state.lock().unwrap();
        state.role_fetches += 1;
        Ok(state.roles.get(&guild_id).cloned().unwrap_or_default())
    }

    async fn send_message(&self, channel_id: ChannelId, payload: &Value) -> PlatformResult<MessageId> {
        let mut state = self.state.lock().unwrap();
        if let Some(kind) = state.send_error.clone() {
            return Err(PlatformError::new(kind));
        }
        state.next_message += 1;
        let message_id = MessageId(1000 + state.next_message);
        state.sent.push(SentMessage {
            channel_id,
            message_id,
            payload: payload.clone(),
        });
        Ok(message_id)
    }

    async fn delete_message(&self, channel_id: ChannelId, message_id: MessageId) -> PlatformResult<()> {
        self.state
            .lock()
            .unwrap()
            .deleted
            .push((channel_id, message_id));
        Ok(())
    }
}
