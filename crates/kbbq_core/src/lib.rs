//! Core domain types for the kbbq bot.
//!
//! Everything in this crate is pure and synchronous: the experience model,
//! role reconciliation, week bucketing, message templating and the records
//! shared by the persistence and engine crates.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod components;
mod experience;
mod ids;
mod level_up;
mod models;
mod reconcile;
mod template;
mod week;

pub use components::{action_rows, parse_button_emoji, ButtonEmoji, MAX_BUTTON_LABEL_LEN};
pub use experience::{
    experience_from_level, level_from_experience, ExperienceRange, LevelProgress,
};
pub use ids::{ChannelId, GuildId, MessageId, RoleId, UserId};
pub use level_up::LevelChange;
pub use models::{
    ActivityKind, Embed, ExperienceChange, LeaderboardOrder, LevelRole, MessageComponent,
    NewLevelRole, NewMessageComponent, NewStatusRole, NewWelcomeMessage, StatusRole, UserLevel,
    WeeklyActivity, WelcomeMessage,
};
pub use reconcile::{desired_level_roles, reconcile, RoleReconciliation};
pub use template::{avatar_url, build_delivery_payload, parse_payload, render, TemplateVars};
pub use week::{current_week, week_bucket};
