//! Every engine, wired from one context.

use crate::{
    BotContext, CommandService, EmbedDelivery, GuildLifecycle, LevelRoleService, MessageLeveling,
    RewardScheduler, StatusRoleEngine, WelcomeService,
};

/// The engines the gateway adapter dispatches events to.
#[derive(Clone, derive_getters::Getters)]
pub struct Engines {
    context: BotContext,
    leveling: MessageLeveling,
    rewards: RewardScheduler,
    status_roles: StatusRoleEngine,
    welcome: WelcomeService,
    commands: CommandService,
    lifecycle: GuildLifecycle,
}

impl Engines {
    /// Build every engine over `context`.
    pub fn new(context: BotContext) -> Self {
        let roles = LevelRoleService::new(context.clone());
        let embeds = EmbedDelivery::new(context.clone());
        Self {
            leveling: MessageLeveling::new(context.clone(), roles.clone()),
            rewards: RewardScheduler::new(context.clone(), roles.clone()),
            status_roles: StatusRoleEngine::new(context.clone(), roles.clone(), embeds.clone()),
            welcome: WelcomeService::new(context.clone(), embeds.clone()),
            commands: CommandService::new(context.clone(), roles, embeds),
            lifecycle: GuildLifecycle::new(context.clone()),
            context,
        }
    }
}
