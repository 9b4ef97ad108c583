//! Status-role engine.
//!
//! A presence update moves a member between "no custom status" and "custom
//! status `text`". Every status role whose required text appears in the
//! current status (case-insensitively) is desired; every other configured
//! status role is removed. The edit is a single role-replacement call.

use crate::{BotContext, EmbedDelivery, LevelRoleService, Metric};
use kbbq_cache::PresenceTransition;
use kbbq_core::{reconcile, GuildId, RoleId, RoleReconciliation, StatusRole, UserId};
use kbbq_error::KbbqResult;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument};

/// What a presence update did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusOutcome {
    /// The cached status did not change
    Unchanged,
    /// No role edit was needed or possible
    Skipped,
    /// Roles were replaced
    Updated(RoleReconciliation),
}

/// Grants and revokes roles from custom-status text.
#[derive(Clone)]
pub struct StatusRoleEngine {
    ctx: BotContext,
    roles: LevelRoleService,
    embeds: EmbedDelivery,
}

impl StatusRoleEngine {
    /// Create the engine.
    pub fn new(ctx: BotContext, roles: LevelRoleService, embeds: EmbedDelivery) -> Self {
        Self { ctx, roles, embeds }
    }

    /// React to a member's custom status changing to `status`.
    #[instrument(skip(self), fields(guild_id = %guild_id, user_id = %user_id))]
    pub async fn handle_presence(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        status: Option<&str>,
    ) -> KbbqResult<StatusOutcome> {
        let (previous, current) = match self.ctx.caches().presence().observe(guild_id, user_id, status) {
            PresenceTransition::Unchanged => return Ok(StatusOutcome::Unchanged),
            PresenceTransition::Set { previous, current } => (previous, Some(current)),
            PresenceTransition::Cleared { previous } => (Some(previous), None),
        };

        let configured = self.ctx.repository().list_status_roles(guild_id).await?;
        if configured.is_empty() {
            return Ok(StatusOutcome::Skipped);
        }
        let valid = self.prune_stale(guild_id, configured).await?;

        let now_matching = matching(&valid, current.as_deref());
        if now_matching.is_empty() && matching(&valid, previous.as_deref()).is_empty() {
            debug!("Status matches no status role");
            return Ok(StatusOutcome::Skipped);
        }

        let managed: BTreeSet<RoleId> = valid.iter().map(|role| role.role_id).collect();
        let desired: BTreeSet<RoleId> = now_matching.iter().map(|role| role.role_id).collect();

        let member = match self.ctx.api().member(guild_id, user_id).await {
            Ok(member) => member,
            Err(e) => {
                self.ctx.absorb(guild_id, "fetch member", e.into())?;
                return Ok(StatusOutcome::Skipped);
            }
        };
        let reconciliation = reconcile(&member.roles, &managed, &desired);
        if reconciliation.is_noop() {
            return Ok(StatusOutcome::Skipped);
        }

        if let Err(e) = self
            .ctx
            .api()
            .set_member_roles(guild_id, user_id, &reconciliation.new_roles)
            .await
        {
            self.ctx.absorb(guild_id, "edit status roles", e.into())?;
            return Ok(StatusOutcome::Skipped);
        }
        info!(
            added = reconciliation.added.len(),
            removed = reconciliation.removed.len(),
            "Status roles updated"
        );
        self.ctx
            .metrics()
            .inc(Metric::StatusRoleUpdates, &[("guildId", guild_id.to_string().as_str())]);

        for role in now_matching
            .iter()
            .filter(|role| reconciliation.added.contains(&role.role_id))
        {
            if let Some((channel_id, embed_name)) = role.announcement() {
                self.embeds
                    .deliver_once(guild_id, channel_id, embed_name, &member)
                    .await?;
            }
        }

        Ok(StatusOutcome::Updated(reconciliation))
    }

    /// Delete status roles whose role no longer exists; returns the rest.
    async fn prune_stale(
        &self,
        guild_id: GuildId,
        configured: Vec<StatusRole>,
    ) -> KbbqResult<Vec<StatusRole>> {
        if let Err(e) = self.roles.ensure_role_cache(guild_id).await {
            self.ctx.absorb(guild_id, "fetch guild roles", e)?;
        }
        let cache = self.ctx.caches().roles();
        let (valid, stale): (Vec<_>, Vec<_>) = configured
            .into_iter()
            .partition(|role| cache.contains(guild_id, role.role_id) != Some(false));

        let stale_roles: BTreeSet<RoleId> = stale.iter().map(|role| role.role_id).collect();
        for role_id in stale_roles {
            let deleted = self
                .ctx
                .repository()
                .delete_status_roles_for_role(guild_id, role_id)
                .await?;
            info!(role_id = %role_id, deleted, "Deleted status roles for a removed role");
        }
        Ok(valid)
    }
}

fn matching<'a>(roles: &'a [StatusRole], status: Option<&str>) -> Vec<&'a StatusRole> {
    match status {
        Some(text) => roles.iter().filter(|role| role.matches(text)).collect(),
        None => Vec::new(),
    }
}
