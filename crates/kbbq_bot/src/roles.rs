//! Level-role reconciliation.

use crate::BotContext;
use kbbq_core::{desired_level_roles, reconcile, GuildId, LevelChange, RoleReconciliation, UserId, UserLevel};
use kbbq_error::KbbqResult;
use tracing::{debug, instrument};

/// Keeps members' level roles in line with their level.
#[derive(Clone)]
pub struct LevelRoleService {
    ctx: BotContext,
}

impl LevelRoleService {
    /// Create the service.
    pub fn new(ctx: BotContext) -> Self {
        Self { ctx }
    }

    /// Fetch the guild's roles unless they are already cached.
    pub async fn ensure_role_cache(&self, guild_id: GuildId) -> KbbqResult<()> {
        let roles = self.ctx.caches().roles();
        if roles.is_populated(guild_id) {
            return Ok(());
        }
        let fetched = self.ctx.api().guild_roles(guild_id).await?;
        debug!(guild_id = %guild_id, count = fetched.len(), "Populated role cache");
        roles.populate(guild_id, fetched);
        Ok(())
    }

    /// Give a member exactly the ladder roles their level has earned.
    ///
    /// Returns `None` when the edit was skipped (member gone, permissions
    /// missing, role vanished). Rungs whose role is missing from the guild
    /// are ignored.
    #[instrument(skip(self), fields(guild_id = %guild_id, user_id = %user_id))]
    pub async fn reconcile_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        level: u64,
    ) -> KbbqResult<Option<RoleReconciliation>> {
        let ladder = self.ctx.repository().list_level_roles(guild_id).await?;
        if ladder.is_empty() {
            return Ok(Some(RoleReconciliation::default()));
        }

        if let Err(e) = self.ensure_role_cache(guild_id).await {
            self.ctx.absorb(guild_id, "fetch guild roles", e)?;
            return Ok(None);
        }
        let cache = self.ctx.caches().roles();
        let ladder: Vec<_> = ladder
            .into_iter()
            .filter(|rung| cache.contains(guild_id, rung.role_id) != Some(false))
            .collect();
        let (managed, desired) = desired_level_roles(&ladder, level);

        let member = match self.ctx.api().member(guild_id, user_id).await {
            Ok(member) => member,
            Err(e) => {
                self.ctx.absorb(guild_id, "fetch member", e.into())?;
                return Ok(None);
            }
        };

        let reconciliation = reconcile(&member.roles, &managed, &desired);
        if reconciliation.is_noop() {
            return Ok(Some(reconciliation));
        }
        match self
            .ctx
            .api()
            .set_member_roles(guild_id, user_id, &reconciliation.new_roles)
            .await
        {
            Ok(_) => Ok(Some(reconciliation)),
            Err(e) => {
                self.ctx.absorb(guild_id, "edit level roles", e.into())?;
                Ok(None)
            }
        }
    }

    /// Persist a recomputed level and reconcile roles when `record` is stale.
    ///
    /// Returns the change, or `None` when the cached level was already right.
    #[instrument(skip(self, record), fields(guild_id = %record.guild_id, user_id = %record.user_id))]
    pub async fn sync_level(&self, record: &UserLevel) -> KbbqResult<Option<LevelChange>> {
        let computed = record.computed_level();
        if computed == record.level {
            return Ok(None);
        }

        let reconciliation = self
            .reconcile_member(record.guild_id, record.user_id, computed)
            .await?
            .unwrap_or_default();
        self.ctx
            .repository()
            .set_level(record.guild_id, record.user_id, computed)
            .await?;

        Ok(Some(LevelChange {
            user_id: record.user_id,
            previous_level: record.level,
            new_level: computed,
            added: reconciliation.added.into_iter().collect(),
            removed: reconciliation.removed.into_iter().collect(),
        }))
    }
}
