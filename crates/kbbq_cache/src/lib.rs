//! Process-local state for the kbbq bot.
//!
//! Each cache is an arena of per-guild state indexed by guild id, created
//! lazily on first access and dropped with [`BotCaches::evict_guild`] when
//! the process stops serving a guild. None of it is shared across
//! processes; the database remains the only cross-process source of truth.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod arena;
mod caches;
mod expiring;
mod presence;
mod roles;
mod voice;

pub use arena::GuildArena;
pub use caches::{BotCaches, CacheConfig, CacheConfigBuilder, DeliveryKey};
pub use expiring::ExpiringMap;
pub use presence::{PresenceCache, PresenceTransition};
pub use roles::GuildRoleCache;
pub use voice::{VoiceChange, VoiceParticipants, VoiceStateSnapshot};
