//! Periodic voice rewards.

use crate::{BotContext, LevelRoleService, Metric, MetricOp};
use kbbq_core::{current_week, GuildId, UserId};
use kbbq_error::KbbqResult;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, instrument, warn};

/// Totals for one reward tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewardSummary {
    /// Guilds with at least one participant
    pub guilds: usize,
    /// Members rewarded across all guilds
    pub rewarded: usize,
    /// Guilds whose batch failed
    pub failed: usize,
}

/// Grants experience and voice minutes to everyone tracked in voice.
#[derive(Clone)]
pub struct RewardScheduler {
    ctx: BotContext,
    roles: LevelRoleService,
}

impl RewardScheduler {
    /// Create the scheduler.
    pub fn new(ctx: BotContext, roles: LevelRoleService) -> Self {
        Self { ctx, roles }
    }

    /// Tick on the configured interval forever.
    ///
    /// The first tick fires one interval after start.
    pub async fn run(self) {
        let period = self.ctx.config().reward_interval();
        info!(interval_secs = period.as_secs(), "Starting voice reward scheduler");
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let summary = self.tick().await;
            let purged = self.ctx.caches().purge_expired();
            info!(
                guilds = summary.guilds,
                rewarded = summary.rewarded,
                failed = summary.failed,
                purged,
                "Voice reward tick complete"
            );
        }
    }

    /// Reward every active guild for the current week.
    pub async fn tick(&self) -> RewardSummary {
        self.tick_at(&current_week()).await
    }

    /// Reward every active guild, recording minutes under `week`.
    ///
    /// Each guild is independent: a failed batch is logged and the tick moves on.
    pub async fn tick_at(&self, week: &str) -> RewardSummary {
        let mut summary = RewardSummary::default();
        for (guild_id, participants) in self.ctx.caches().voice().active_guilds() {
            summary.guilds += 1;
            match self.reward_guild(guild_id, &participants, week).await {
                Ok(rewarded) => summary.rewarded += rewarded,
                Err(e) => {
                    summary.failed += 1;
                    error!(guild_id = %guild_id, error = %e, "Failed to reward voice participants");
                }
            }
        }
        summary
    }

    #[instrument(skip(self, participants), fields(guild_id = %guild_id, participants = participants.len()))]
    async fn reward_guild(
        &self,
        guild_id: GuildId,
        participants: &[UserId],
        week: &str,
    ) -> KbbqResult<usize> {
        let config = self.ctx.config();
        let metrics = self.ctx.metrics();
        let guild_label = guild_id.to_string();
        let labels = [("guildId", guild_label.as_str())];
        metrics.submit(Metric::UsersInVoice, MetricOp::Set, participants.len() as f64, &labels);

        let delta = {
            let mut rng = rand::thread_rng();
            config.voice.experience.roll(&mut rng)
        };
        let repository = self.ctx.repository();
        let records = repository
            .increment_experience_batch(guild_id, participants, delta)
            .await?;
        repository
            .record_voice_minutes_batch(guild_id, participants, week, config.voice.minutes_per_tick)
            .await?;

        metrics.submit(
            Metric::MinutesInVoice,
            MetricOp::Inc,
            (config.voice.minutes_per_tick * participants.len() as u64) as f64,
            &labels,
        );
        metrics.submit(Metric::UsersRewarded, MetricOp::Set, records.len() as f64, &labels);

        for record in records.iter().filter(|record| record.is_level_stale()) {
            match self.roles.sync_level(record).await {
                Ok(Some(change)) => info!(
                    user_id = %change.user_id,
                    previous_level = change.previous_level,
                    new_level = change.new_level,
                    "Level changed from voice activity"
                ),
                Ok(None) => {}
                Err(e) => warn!(user_id = %record.user_id, error = %e, "Failed to sync level"),
            }
        }

        Ok(records.len())
    }
}
