//! Welcome messages for new members.

use crate::{BotContext, EmbedDelivery};
use kbbq_core::{GuildId, WelcomeMessage};
use kbbq_error::KbbqResult;
use kbbq_interface::MemberSnapshot;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

/// Result of greeting one member.
#[derive(Debug, Default)]
pub struct WelcomeSummary {
    /// Messages posted
    pub sent: usize,
    /// Welcome messages deleted because their embed is gone
    pub removed: usize,
    /// Welcome messages that failed
    pub failed: usize,
    /// Pending deletions of expiring messages
    pub expiries: Vec<JoinHandle<()>>,
}

/// Posts every configured welcome message when a member joins.
#[derive(Clone)]
pub struct WelcomeService {
    ctx: BotContext,
    embeds: EmbedDelivery,
}

impl WelcomeService {
    /// Create the service.
    pub fn new(ctx: BotContext, embeds: EmbedDelivery) -> Self {
        Self { ctx, embeds }
    }

    /// Greet `member`. One failing welcome message does not stop the others.
    #[instrument(skip(self, member), fields(guild_id = %guild_id, user_id = %member.user_id))]
    pub async fn handle_member_join(
        &self,
        guild_id: GuildId,
        member: &MemberSnapshot,
    ) -> KbbqResult<WelcomeSummary> {
        let messages = self.ctx.repository().list_welcome_messages(guild_id).await?;
        let mut summary = WelcomeSummary::default();

        for message in messages {
            match self.deliver(guild_id, &message, member).await {
                Ok(Delivery::Sent(expiry)) => {
                    summary.sent += 1;
                    summary.expiries.extend(expiry);
                }
                Ok(Delivery::Removed) => summary.removed += 1,
                Ok(Delivery::Skipped) => {}
                Err(e) => {
                    summary.failed += 1;
                    error!(welcome_id = message.id, error = %e, "Failed to send welcome message");
                }
            }
        }
        Ok(summary)
    }

    async fn deliver(
        &self,
        guild_id: GuildId,
        message: &WelcomeMessage,
        member: &MemberSnapshot,
    ) -> KbbqResult<Delivery> {
        let repository = self.ctx.repository();
        if repository.get_embed(guild_id, &message.embed_name).await?.is_none() {
            repository.delete_welcome_message(guild_id, message.id).await?;
            info!(welcome_id = message.id, embed = %message.embed_name, "Removed welcome message for a deleted embed");
            return Ok(Delivery::Removed);
        }

        let sent = match self
            .embeds
            .send(guild_id, message.channel_id, &message.embed_name, member)
            .await
        {
            Ok(sent) => sent,
            Err(e) => {
                self.ctx.absorb(guild_id, "send welcome message", e)?;
                return Ok(Delivery::Skipped);
            }
        };
        let Some(message_id) = sent else {
            return Ok(Delivery::Skipped);
        };

        let expiry = message.expiry_secs.map(|secs| {
            let api = self.ctx.api().clone();
            let channel_id = message.channel_id;
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(secs)).await;
                match api.delete_message(channel_id, message_id).await {
                    Ok(()) => debug!(%channel_id, %message_id, "Expired welcome message deleted"),
                    Err(e) => warn!(%channel_id, %message_id, error = %e, "Failed to delete expired welcome message"),
                }
            })
        });
        Ok(Delivery::Sent(expiry))
    }
}

enum Delivery {
    Sent(Option<JoinHandle<()>>),
    Removed,
    Skipped,
}
