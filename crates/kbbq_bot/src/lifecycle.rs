//! Guild lifecycle events feeding the ephemeral caches.

use crate::{BotContext, Metric, MetricOp, WebhookChannel};
use kbbq_cache::{VoiceChange, VoiceStateSnapshot};
use kbbq_core::{GuildId, RoleId, UserId};
use kbbq_interface::GuildRole;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// A guild-create payload reduced to what the caches need.
#[derive(Debug, Clone)]
pub struct GuildSnapshot {
    /// Guild
    pub guild_id: GuildId,
    /// Display name
    pub name: String,
    /// Owner
    pub owner_id: UserId,
    /// Approximate member count
    pub member_count: u64,
    /// Every role of the guild
    pub roles: Vec<GuildRole>,
    /// Current voice states
    pub voice_states: Vec<VoiceStateSnapshot>,
}

/// Keeps the caches aligned with the guilds the process serves.
#[derive(Clone)]
pub struct GuildLifecycle {
    ctx: BotContext,
    known: Arc<Mutex<HashMap<GuildId, u64>>>,
}

impl GuildLifecycle {
    /// Create the handler.
    pub fn new(ctx: BotContext) -> Self {
        Self {
            ctx,
            known: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of guilds currently served.
    pub fn guild_count(&self) -> usize {
        self.known.lock().len()
    }

    /// Populate the caches from a guild-create snapshot.
    ///
    /// Returns true the first time the process sees the guild.
    #[instrument(skip(self, snapshot), fields(guild_id = %snapshot.guild_id))]
    pub async fn on_guild_create(&self, snapshot: GuildSnapshot, shard: u32) -> bool {
        let caches = self.ctx.caches();
        caches.roles().populate(snapshot.guild_id, snapshot.roles);
        caches
            .voice()
            .populate(snapshot.guild_id, snapshot.voice_states);

        let (first_seen, guilds, users) = {
            let mut known = self.known.lock();
            let first_seen = known
                .insert(snapshot.guild_id, snapshot.member_count)
                .is_none();
            (first_seen, known.len(), known.values().sum::<u64>())
        };
        let shard_label = shard.to_string();
        self.ctx.metrics().submit(
            Metric::GuildCount,
            MetricOp::Set,
            guilds as f64,
            &[("shard", shard_label.as_str())],
        );

        if first_seen {
            info!(
                name = %snapshot.name,
                member_count = snapshot.member_count,
                shard,
                guilds,
                users,
                "Joined guild"
            );
            let content = format!(
                "**__Joined a New Guild ({guilds} Total)__**\n**Guild Name:** `{}`\n**Guild ID:** `{}`\n**Guild Owner:** <@{}> `[{}]`\n**Guild Member Count:** `{}`\n**Shard ID:** `{shard}`",
                snapshot.name,
                snapshot.guild_id,
                snapshot.owner_id,
                snapshot.owner_id,
                snapshot.member_count,
            );
            self.ctx.webhooks().log(WebhookChannel::Guild, &content).await;
        }
        first_seen
    }

    /// Forget a guild the bot left. Outages (`unavailable`) keep the caches.
    #[instrument(skip(self), fields(guild_id = %guild_id))]
    pub fn on_guild_delete(&self, guild_id: GuildId, unavailable: bool, shard: u32) {
        if unavailable {
            debug!("Guild unavailable, keeping caches");
            return;
        }
        let guilds = {
            let mut known = self.known.lock();
            known.remove(&guild_id);
            known.len()
        };
        self.ctx.caches().evict_guild(guild_id);
        self.ctx.metrics().submit(
            Metric::GuildCount,
            MetricOp::Set,
            guilds as f64,
            &[("shard", shard.to_string().as_str())],
        );
        info!(guilds, "Left guild");
    }

    /// A role was created or edited.
    pub fn on_role_upsert(&self, guild_id: GuildId, role: GuildRole) {
        self.ctx.caches().roles().upsert(guild_id, role);
    }

    /// A role was deleted.
    pub fn on_role_delete(&self, guild_id: GuildId, role_id: RoleId) {
        self.ctx.caches().roles().remove(guild_id, role_id);
    }

    /// Track a member joining, leaving or (un)muting in voice.
    pub fn on_voice_state(&self, guild_id: GuildId, state: &VoiceStateSnapshot) -> VoiceChange {
        let change = self.ctx.caches().voice().apply(guild_id, state);
        if change != VoiceChange::Unchanged {
            debug!(guild_id = %guild_id, user_id = %state.user_id, ?change, "Voice participation changed");
        }
        change
    }
}
