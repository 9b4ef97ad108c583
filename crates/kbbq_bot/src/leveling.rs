//! Message-triggered leveling.

use crate::{BotContext, LevelRoleService, Metric};
use kbbq_core::{
    current_week, ActivityKind, ChannelId, ExperienceChange, GuildId, LevelChange, MessageId,
    UserId, UserLevel,
};
use kbbq_error::KbbqResult;
use serde_json::json;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// The fields of a message-create event the leveling engine reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Guild, absent for direct messages
    pub guild_id: Option<GuildId>,
    /// Channel the message was posted in
    pub channel_id: ChannelId,
    /// The message
    pub message_id: MessageId,
    /// Author
    pub author_id: UserId,
    /// Whether the author is a bot account
    pub author_is_bot: bool,
}

/// What handling a message did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    /// Not a qualifying message
    Ignored,
    /// Counted toward weekly activity; the author is on cooldown
    Counted,
    /// Experience granted without a level change
    Rewarded(UserLevel),
    /// Experience granted and the level changed
    LeveledUp(LevelChange),
}

/// Grants experience for chat messages.
#[derive(Clone)]
pub struct MessageLeveling {
    ctx: BotContext,
    roles: LevelRoleService,
}

impl MessageLeveling {
    /// Create the engine.
    pub fn new(ctx: BotContext, roles: LevelRoleService) -> Self {
        Self { ctx, roles }
    }

    /// Handle a message received now.
    pub async fn handle_message(&self, message: &IncomingMessage) -> KbbqResult<MessageOutcome> {
        self.handle_message_at(message, Instant::now(), &current_week())
            .await
    }

    /// Handle a message as if received at `now` during `week`.
    ///
    /// The weekly message count is recorded before the cooldown check, so a
    /// store failure aborts the message with nothing granted.
    #[instrument(skip(self, message, now), fields(author_id = %message.author_id))]
    pub async fn handle_message_at(
        &self,
        message: &IncomingMessage,
        now: Instant,
        week: &str,
    ) -> KbbqResult<MessageOutcome> {
        let Some(guild_id) = message.guild_id else {
            return Ok(MessageOutcome::Ignored);
        };
        if message.author_is_bot {
            return Ok(MessageOutcome::Ignored);
        }
        let user_id = message.author_id;
        let repository = self.ctx.repository();

        repository
            .record_activity(guild_id, user_id, week, ActivityKind::Messages, 1)
            .await?;

        if !self.ctx.caches().cooldowns().try_acquire(user_id, now) {
            debug!(guild_id = %guild_id, "Author on cooldown");
            return Ok(MessageOutcome::Counted);
        }

        let delta = {
            let mut rng = rand::thread_rng();
            self.ctx.config().leveling.message_experience.roll(&mut rng)
        };
        let delta = i64::try_from(delta).unwrap_or(i64::MAX);
        let record = repository
            .upsert_experience(guild_id, user_id, ExperienceChange::Increment(delta))
            .await?;

        let computed = record.computed_level();
        if computed == record.level || computed == 0 {
            return Ok(MessageOutcome::Rewarded(record));
        }

        let Some(change) = self.roles.sync_level(&record).await? else {
            return Ok(MessageOutcome::Rewarded(record));
        };
        info!(
            guild_id = %guild_id,
            previous_level = change.previous_level,
            new_level = change.new_level,
            "Level changed"
        );
        self.ctx
            .metrics()
            .inc(Metric::LevelUps, &[("guildId", guild_id.to_string().as_str())]);

        let notice = json!({
            "content": change.notice(),
            "message_reference": {
                "message_id": message.message_id.to_string(),
                "fail_if_not_exists": false,
            },
            "allowed_mentions": { "parse": [], "replied_user": true },
        });
        if let Err(e) = self.ctx.api().send_message(message.channel_id, &notice).await {
            self.ctx.absorb(guild_id, "send level-up notice", e.into())?;
        }

        Ok(MessageOutcome::LeveledUp(change))
    }
}
