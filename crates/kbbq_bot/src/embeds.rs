//! Stored-embed delivery.

use crate::BotContext;
use kbbq_core::{build_delivery_payload, ChannelId, GuildId, MessageId, TemplateVars};
use kbbq_error::KbbqResult;
use kbbq_interface::MemberSnapshot;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Renders stored embeds for a member and posts them.
#[derive(Clone)]
pub struct EmbedDelivery {
    ctx: BotContext,
}

impl EmbedDelivery {
    /// Create the service.
    pub fn new(ctx: BotContext) -> Self {
        Self { ctx }
    }

    /// Post embed `name` to `channel_id` addressed to `member`.
    ///
    /// `Ok(None)` when the embed does not exist. Template and platform errors
    /// are returned unclassified.
    #[instrument(skip(self, member), fields(guild_id = %guild_id, channel_id = %channel_id, user_id = %member.user_id))]
    pub async fn send(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        name: &str,
        member: &MemberSnapshot,
    ) -> KbbqResult<Option<MessageId>> {
        let repository = self.ctx.repository();
        let Some(embed) = repository.get_embed(guild_id, name).await? else {
            info!(embed = name, "Embed no longer exists");
            return Ok(None);
        };
        let components = repository.list_components(guild_id, name).await?;

        let vars = TemplateVars::for_member(
            guild_id,
            member.user_id,
            &member.username,
            member.discriminator,
            member.guild_avatar.as_deref(),
            member.avatar.as_deref(),
        );
        let payload = build_delivery_payload(&embed.payload, &components, member.user_id, &vars)?;
        let message_id = self.ctx.api().send_message(channel_id, &payload).await?;
        Ok(Some(message_id))
    }

    /// Send an announcement unless this member got it within the resend window.
    ///
    /// Returns whether a message was posted. Delivery failures are logged
    /// and release the dedup slot so a later update can retry.
    pub async fn deliver_once(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        name: &str,
        member: &MemberSnapshot,
    ) -> KbbqResult<bool> {
        let deliveries = self.ctx.caches().deliveries();
        let key = (guild_id, name.to_string(), member.user_id);
        if !deliveries.try_acquire(key.clone(), Instant::now()) {
            debug!(guild_id = %guild_id, embed = name, user_id = %member.user_id, "Announcement already sent");
            return Ok(false);
        }

        match self.send(guild_id, channel_id, name, member).await {
            Ok(Some(_)) => Ok(true),
            Ok(None) => {
                deliveries.remove(&key);
                Ok(false)
            }
            Err(e) => {
                deliveries.remove(&key);
                self.ctx.absorb(guild_id, "send announcement", e)?;
                Ok(false)
            }
        }
    }
}
