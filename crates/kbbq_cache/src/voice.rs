//! Voice participant tracking.

use crate::GuildArena;
use kbbq_core::{GuildId, UserId};
use std::collections::BTreeSet;

/// The voice-state fields that decide eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VoiceStateSnapshot {
    /// Member
    pub user_id: UserId,
    /// Connected to a voice channel
    pub in_channel: bool,
    /// Muted themselves
    pub self_mute: bool,
    /// Deafened themselves
    pub self_deaf: bool,
    /// Server-muted
    pub mute: bool,
    /// Server-deafened
    pub deaf: bool,
}

impl VoiceStateSnapshot {
    /// Muted or deafened in any way.
    pub fn is_silenced(&self) -> bool {
        self.self_mute || self.self_deaf || self.mute || self.deaf
    }

    /// Earns voice rewards.
    pub fn is_eligible(&self) -> bool {
        self.in_channel && !self.is_silenced()
    }
}

/// Effect of a voice-state update on the tracked set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceChange {
    /// Started being tracked
    Joined,
    /// Stopped being tracked
    Left,
    /// No change
    Unchanged,
}

/// Members currently eligible for voice rewards, per guild.
#[derive(Debug, Default)]
pub struct VoiceParticipants {
    arena: GuildArena<BTreeSet<UserId>>,
}

impl VoiceParticipants {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a guild's set from a full snapshot.
    pub fn populate(&self, guild_id: GuildId, states: impl IntoIterator<Item = VoiceStateSnapshot>) {
        let eligible = states
            .into_iter()
            .filter(VoiceStateSnapshot::is_eligible)
            .map(|state| state.user_id)
            .collect();
        self.arena.replace(guild_id, eligible);
    }

    /// Apply one voice-state update.
    pub fn apply(&self, guild_id: GuildId, state: &VoiceStateSnapshot) -> VoiceChange {
        self.arena.with_guild(guild_id, |users| {
            let tracked = users.contains(&state.user_id);
            if tracked && !state.is_eligible() {
                users.remove(&state.user_id);
                VoiceChange::Left
            } else if !tracked && state.is_eligible() {
                users.insert(state.user_id);
                VoiceChange::Joined
            } else {
                VoiceChange::Unchanged
            }
        })
    }

    /// Members tracked in a guild.
    pub fn participants(&self, guild_id: GuildId) -> Vec<UserId> {
        self.arena
            .read(guild_id, |users| users.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Every guild with at least one participant.
    pub fn active_guilds(&self) -> Vec<(GuildId, Vec<UserId>)> {
        self.arena.collect(|guild_id, users| {
            (!users.is_empty()).then(|| (guild_id, users.iter().copied().collect()))
        })
    }

    /// Forget a guild.
    pub fn evict(&self, guild_id: GuildId) -> bool {
        self.arena.evict(guild_id)
    }
}
