//! Guild role cache.

use crate::GuildArena;
use kbbq_core::{GuildId, RoleId};
use kbbq_interface::GuildRole;
use std::collections::HashMap;

/// Role metadata per guild.
///
/// A guild that was never populated is "unknown", which is different from
/// a populated guild lacking a role: only the latter proves a role is gone.
#[derive(Debug, Default)]
pub struct GuildRoleCache {
    arena: GuildArena<HashMap<RoleId, GuildRole>>,
}

impl GuildRoleCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a guild's roles.
    pub fn populate(&self, guild_id: GuildId, roles: impl IntoIterator<Item = GuildRole>) {
        let roles = roles.into_iter().map(|role| (role.id, role)).collect();
        self.arena.replace(guild_id, roles);
    }

    /// Whether the guild's roles are known.
    pub fn is_populated(&self, guild_id: GuildId) -> bool {
        self.arena.contains(guild_id)
    }

    /// `Some(exists)` for a populated guild, `None` when unknown.
    pub fn contains(&self, guild_id: GuildId, role_id: RoleId) -> Option<bool> {
        self.arena.read(guild_id, |roles| roles.contains_key(&role_id))
    }

    /// Insert or refresh one role of a populated guild.
    ///
    /// An unknown guild stays unknown; a partial entry would make every
    /// other role look deleted.
    pub fn upsert(&self, guild_id: GuildId, role: GuildRole) {
        self.arena.update(guild_id, |roles| {
            roles.insert(role.id, role);
        });
    }

    /// Drop one role of a populated guild.
    pub fn remove(&self, guild_id: GuildId, role_id: RoleId) {
        self.arena.update(guild_id, |roles| {
            roles.remove(&role_id);
        });
    }

    /// Forget a guild; the next lookup will repopulate it.
    pub fn evict(&self, guild_id: GuildId) -> bool {
        self.arena.evict(guild_id)
    }
}
