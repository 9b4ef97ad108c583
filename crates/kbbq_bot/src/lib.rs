//! Engines of the kbbq leveling bot.
//!
//! Everything here is written against the [`kbbq_interface`] seams, so the
//! engines run unchanged over PostgreSQL and the gateway in production and
//! over in-memory fakes in tests:
//! - **MessageLeveling**: experience and weekly counts for chat messages
//! - **RewardScheduler**: periodic experience for members in voice
//! - **StatusRoleEngine**: roles driven by custom-status text
//! - **CommandService**: application commands as plain values
//! - **GuildLifecycle**: keeps the per-guild caches aligned with the gateway

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod commands;
mod config;
mod context;
mod embeds;
mod engines;
mod leveling;
mod lifecycle;
mod metrics;
mod rewards;
mod roles;
mod status_roles;
mod webhook;
mod welcome;

pub use api::{create_router, serve, ApiState};
pub use commands::{
    Command, CommandContext, CommandReply, CommandService, ExperienceAction, LeaderboardKind,
    COLOR_ERROR, COLOR_PRIMARY, COLOR_SUCCESS, COLOR_WARNING,
};
pub use config::{
    BotConfig, DatabaseConfig, LevelingConfig, MetricsConfig, Secrets, StatusRoleConfig,
    VoiceConfig, MAX_WINDOW_SECS,
};
pub use context::BotContext;
pub use embeds::EmbedDelivery;
pub use engines::Engines;
pub use leveling::{IncomingMessage, MessageLeveling, MessageOutcome};
pub use lifecycle::{GuildLifecycle, GuildSnapshot};
pub use metrics::{BotMetrics, Metric, MetricOp};
pub use rewards::{RewardScheduler, RewardSummary};
pub use roles::LevelRoleService;
pub use status_roles::{StatusOutcome, StatusRoleEngine};
pub use webhook::{WebhookChannel, WebhookLogger};
pub use welcome::{WelcomeService, WelcomeSummary};
