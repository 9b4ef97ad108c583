//! Custom-status cache and its transitions.

use crate::GuildArena;
use kbbq_core::{GuildId, UserId};
use std::collections::HashMap;

/// What a presence update did to a member's cached custom status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceTransition {
    /// Same text as before, or still no custom status.
    Unchanged,
    /// A custom status appeared or changed.
    Set {
        /// Text before the update, if any
        previous: Option<String>,
        /// Text after the update
        current: String,
    },
    /// The custom status disappeared.
    Cleared {
        /// Text before the update
        previous: String,
    },
}

/// Last-seen custom status per (guild, user).
#[derive(Debug, Default)]
pub struct PresenceCache {
    arena: GuildArena<HashMap<UserId, String>>,
}

impl PresenceCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a presence update and report the transition.
    ///
    /// `status` is the custom-activity text; `None` and empty text both mean
    /// "no custom status".
    ///
    /// # Examples
    ///
    /// ```
    /// use kbbq_cache::{PresenceCache, PresenceTransition};
    /// use kbbq_core::{GuildId, UserId};
    ///
    /// let cache = PresenceCache::new();
    /// let (g, u) = (GuildId(1), UserId(2));
    /// assert!(matches!(cache.observe(g, u, Some("chess")), PresenceTransition::Set { .. }));
    /// assert_eq!(cache.observe(g, u, Some("chess")), PresenceTransition::Unchanged);
    /// assert_eq!(
    ///     cache.observe(g, u, None),
    ///     PresenceTransition::Cleared { previous: "chess".into() }
    /// );
    /// ```
    pub fn observe(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        status: Option<&str>,
    ) -> PresenceTransition {
        let status = status.filter(|text| !text.is_empty());
        self.arena.with_guild(guild_id, |statuses| match status {
            Some(text) => {
                let previous = statuses.insert(user_id, text.to_string());
                if previous.as_deref() == Some(text) {
                    PresenceTransition::Unchanged
                } else {
                    PresenceTransition::Set {
                        previous,
                        current: text.to_string(),
                    }
                }
            }
            None => match statuses.remove(&user_id) {
                Some(previous) => PresenceTransition::Cleared { previous },
                None => PresenceTransition::Unchanged,
            },
        })
    }

    /// The cached status of a member.
    pub fn status(&self, guild_id: GuildId, user_id: UserId) -> Option<String> {
        self.arena
            .read(guild_id, |statuses| statuses.get(&user_id).cloned())
            .flatten()
    }

    /// Forget a guild.
    pub fn evict(&self, guild_id: GuildId) -> bool {
        self.arena.evict(guild_id)
    }
}
