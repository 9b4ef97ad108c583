//! Per-guild state arena.

use kbbq_core::GuildId;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Guild-indexed state with lazy creation and explicit eviction.
///
/// Closures run under the arena lock and must not block or await.
#[derive(Debug)]
pub struct GuildArena<T> {
    guilds: Mutex<HashMap<GuildId, T>>,
}

impl<T> Default for GuildArena<T> {
    fn default() -> Self {
        Self {
            guilds: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: Default> GuildArena<T> {
    /// Run `f` on the guild's state, creating it first if needed.
    pub fn with_guild<R>(&self, guild_id: GuildId, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guilds = self.guilds.lock();
        f(guilds.entry(guild_id).or_default())
    }
}

impl<T> GuildArena<T> {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` on the guild's state if it exists.
    pub fn read<R>(&self, guild_id: GuildId, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.guilds.lock().get(&guild_id).map(f)
    }

    /// Run `f` on the guild's state if it exists, without creating it.
    pub fn update<R>(&self, guild_id: GuildId, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.guilds.lock().get_mut(&guild_id).map(f)
    }

    /// Replace the guild's state.
    pub fn replace(&self, guild_id: GuildId, state: T) {
        self.guilds.lock().insert(guild_id, state);
    }

    /// Drop the guild's state; true if there was any.
    pub fn evict(&self, guild_id: GuildId) -> bool {
        self.guilds.lock().remove(&guild_id).is_some()
    }

    /// Whether the guild has state.
    pub fn contains(&self, guild_id: GuildId) -> bool {
        self.guilds.lock().contains_key(&guild_id)
    }

    /// Number of guilds with state.
    pub fn len(&self) -> usize {
        self.guilds.lock().len()
    }

    /// True when no guild has state.
    pub fn is_empty(&self) -> bool {
        self.guilds.lock().is_empty()
    }

    /// Collect a value from every guild's state.
    pub fn collect<R>(&self, mut f: impl FnMut(GuildId, &T) -> Option<R>) -> Vec<R> {
        self.guilds
            .lock()
            .iter()
            .filter_map(|(guild_id, state)| f(*guild_id, state))
            .collect()
    }
}
