//! Services shared by every engine.

use crate::{BotConfig, BotMetrics, WebhookLogger};
use kbbq_cache::BotCaches;
use kbbq_core::GuildId;
use kbbq_error::{KbbqError, KbbqResult, PlatformErrorKind};
use kbbq_interface::{GuildApi, KbbqRepository};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Handles to the repository, platform API, caches and metrics.
///
/// Constructed once at startup and cloned into each engine.
#[derive(Clone, derive_getters::Getters)]
pub struct BotContext {
    repository: Arc<dyn KbbqRepository>,
    api: Arc<dyn GuildApi>,
    caches: Arc<BotCaches>,
    metrics: BotMetrics,
    config: Arc<BotConfig>,
    webhooks: WebhookLogger,
}

impl BotContext {
    /// Assemble a context; caches are built from `config`.
    pub fn new(
        repository: Arc<dyn KbbqRepository>,
        api: Arc<dyn GuildApi>,
        metrics: BotMetrics,
        config: BotConfig,
        webhooks: WebhookLogger,
    ) -> Self {
        let caches = Arc::new(BotCaches::new(&config.cache_config()));
        Self {
            repository,
            api,
            caches,
            metrics,
            config: Arc::new(config),
            webhooks,
        }
    }

    /// Log and swallow errors that must not escape background work.
    ///
    /// Vanished targets are logged at debug, permission and payload failures
    /// at error. An unknown role also invalidates the guild's role cache.
    /// Anything else is returned to the caller.
    pub fn absorb(&self, guild_id: GuildId, action: &'static str, err: KbbqError) -> KbbqResult<()> {
        if let Some(platform) = err.as_platform() {
            match &platform.kind {
                PlatformErrorKind::UnknownMember | PlatformErrorKind::UnknownChannel => {
                    debug!(guild_id = %guild_id, action, error = %platform, "Target no longer exists");
                    return Ok(());
                }
                PlatformErrorKind::UnknownRole => {
                    self.caches.roles().evict(guild_id);
                    info!(guild_id = %guild_id, action, "Role vanished, role cache invalidated");
                    return Ok(());
                }
                PlatformErrorKind::MissingPermissions(_) | PlatformErrorKind::InvalidPayload(_) => {
                    error!(guild_id = %guild_id, action, error = %platform, "Platform rejected request");
                    return Ok(());
                }
                PlatformErrorKind::Http(_) => {}
            }
        }
        if let Some(template) = err.as_template() {
            error!(guild_id = %guild_id, action, error = %template, "Stored template is invalid");
            return Ok(());
        }
        Err(err)
    }
}
