//! [`GuildApi`] over serenity's REST client.

use crate::conversions::{guild_role, member_snapshot, role_id};
use crate::platform_error;
use async_trait::async_trait;
use kbbq_core::{ChannelId, GuildId, MessageId, RoleId, UserId};
use kbbq_error::PlatformResult;
use kbbq_interface::{GuildApi, GuildRole, MemberSnapshot};
use serde_json::{Value, json};
use serenity::http::Http;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, instrument};

const ROLE_EDIT_REASON: &str = "Level and status role sync";

fn guild(id: GuildId) -> serenity::all::GuildId {
    serenity::all::GuildId::new(id.get())
}

fn user(id: UserId) -> serenity::all::UserId {
    serenity::all::UserId::new(id.get())
}

fn channel(id: ChannelId) -> serenity::all::ChannelId {
    serenity::all::ChannelId::new(id.get())
}

/// Discord REST calls for the engines.
#[derive(Clone)]
pub struct SerenityGuildApi {
    http: Arc<Http>,
}

impl SerenityGuildApi {
    /// Standalone client authenticated with a bot token.
    pub fn new(token: impl AsRef<str>) -> Self {
        Self::with_http_client(Arc::new(Http::new(token.as_ref())))
    }

    /// Share an existing HTTP client.
    pub fn with_http_client(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl GuildApi for SerenityGuildApi {
    #[instrument(skip(self), fields(guild_id = %guild_id, user_id = %user_id))]
    async fn member(&self, guild_id: GuildId, user_id: UserId) -> PlatformResult<MemberSnapshot> {
        let member = self
            .http
            .get_member(guild(guild_id), user(user_id))
            .await
            .map_err(platform_error)?;
        Ok(member_snapshot(&member))
    }

    #[instrument(skip(self, roles), fields(guild_id = %guild_id, user_id = %user_id, roles = roles.len()))]
    async fn set_member_roles(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        roles: &BTreeSet<RoleId>,
    ) -> PlatformResult<BTreeSet<RoleId>> {
        let ids: Vec<String> = roles.iter().map(|role| role.get().to_string()).collect();
        let member = self
            .http
            .edit_member(
                guild(guild_id),
                user(user_id),
                &json!({ "roles": ids }),
                Some(ROLE_EDIT_REASON),
            )
            .await
            .map_err(platform_error)?;
        debug!("Member roles replaced");
        Ok(member.roles.iter().copied().map(role_id).collect())
    }

    #[instrument(skip(self), fields(guild_id = %guild_id))]
    async fn guild_roles(&self, guild_id: GuildId) -> PlatformResult<Vec<GuildRole>> {
        let roles = self
            .http
            .get_guild_roles(guild(guild_id))
            .await
            .map_err(platform_error)?;
        Ok(roles.iter().map(guild_role).collect())
    }

    #[instrument(skip(self, payload), fields(channel_id = %channel_id))]
    async fn send_message(&self, channel_id: ChannelId, payload: &Value) -> PlatformResult<MessageId> {
        let message = self
            .http
            .send_message(channel(channel_id), Vec::new(), payload)
            .await
            .map_err(platform_error)?;
        Ok(MessageId(message.id.get()))
    }

    #[instrument(skip(self), fields(channel_id = %channel_id, message_id = %message_id))]
    async fn delete_message(&self, channel_id: ChannelId, message_id: MessageId) -> PlatformResult<()> {
        self.http
            .delete_message(
                channel(channel_id),
                serenity::all::MessageId::new(message_id.get()),
                None,
            )
            .await
            .map_err(platform_error)
    }
}
