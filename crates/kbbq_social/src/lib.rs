//! Discord gateway adapter for the kbbq bot.
//!
//! Translates serenity events into calls on [`kbbq_bot::Engines`] and
//! implements [`kbbq_interface::GuildApi`] over serenity's REST client:
//! - **handler**: `EventHandler` for guilds, messages, presences, voice and interactions
//! - **api**: member, role and message REST calls with classified errors
//! - **options**: application-command options parsed into [`kbbq_bot::Command`]
//! - **definitions**: the commands registered on ready

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod client;
mod conversions;
mod definitions;
mod error;
mod handler;
mod options;

pub use api::SerenityGuildApi;
pub use client::KbbqBot;
pub use conversions::{custom_status, guild_snapshot, member_snapshot, voice_snapshot};
pub use definitions::{command_definitions, registers_commands};
pub use error::{
    classify_code, platform_error, INVALID_FORM_BODY, INVALID_REQUEST_BODY, MISSING_ACCESS,
    MISSING_PERMISSIONS, UNKNOWN_CHANNEL, UNKNOWN_MEMBER, UNKNOWN_MESSAGE, UNKNOWN_ROLE,
    UNKNOWN_USER,
};
pub use handler::KbbqHandler;
pub use options::{parse_command, CommandOptions, OptionValue};
