//! All process-local caches behind one handle.

use crate::{ExpiringMap, GuildRoleCache, PresenceCache, VoiceParticipants};
use derive_getters::Getters;
use kbbq_core::{GuildId, UserId};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Configuration for the process-local caches.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(default)]
pub struct CacheConfig {
    /// Seconds between experience grants for the same user
    #[serde(default = "default_message_cooldown_secs")]
    message_cooldown_secs: u64,

    /// Seconds before the same embed is sent to the same user again
    #[serde(default = "default_embed_resend_secs")]
    embed_resend_secs: u64,
}

fn default_message_cooldown_secs() -> u64 {
    60
}

fn default_embed_resend_secs() -> u64 {
    24 * 60 * 60
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            message_cooldown_secs: default_message_cooldown_secs(),
            embed_resend_secs: default_embed_resend_secs(),
        }
    }
}

/// (guild, embed name, user) of a status-role announcement.
pub type DeliveryKey = (GuildId, String, UserId);

/// Every ephemeral cache the engines share.
#[derive(Debug, Getters)]
pub struct BotCaches {
    presence: PresenceCache,
    voice: VoiceParticipants,
    roles: GuildRoleCache,
    cooldowns: ExpiringMap<UserId>,
    deliveries: ExpiringMap<DeliveryKey>,
}

impl BotCaches {
    /// Build the caches.
    pub fn new(config: &CacheConfig) -> Self {
        tracing::debug!(
            message_cooldown_secs = config.message_cooldown_secs,
            embed_resend_secs = config.embed_resend_secs,
            "Creating bot caches"
        );
        Self {
            presence: PresenceCache::new(),
            voice: VoiceParticipants::new(),
            roles: GuildRoleCache::new(),
            cooldowns: ExpiringMap::new(Duration::from_secs(config.message_cooldown_secs)),
            deliveries: ExpiringMap::new(Duration::from_secs(config.embed_resend_secs)),
        }
    }

    /// Drop everything held for a guild the process no longer serves.
    pub fn evict_guild(&self, guild_id: GuildId) {
        self.presence.evict(guild_id);
        self.voice.evict(guild_id);
        self.roles.evict(guild_id);
        let dropped = self
            .deliveries
            .retain(Instant::now(), |(guild, _, _)| *guild != guild_id);
        tracing::debug!(guild_id = %guild_id, dropped, "Evicted guild from caches");
    }

    /// Drop expired cooldowns and delivery records.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        self.cooldowns.retain(now, |_| true) + self.deliveries.retain(now, |_| true)
    }
}

impl Default for BotCaches {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}
