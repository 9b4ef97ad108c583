//! Records shared by the persistence layer, the engines and the commands.

use crate::{
    level_from_experience, ButtonEmoji, ChannelId, GuildId, RoleId, UserId,
};
use serde::{Deserialize, Serialize};

/// A user's experience in one guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLevel {
    /// Guild the experience was earned in
    pub guild_id: GuildId,
    /// Owner of the experience
    pub user_id: UserId,
    /// Experience total, never negative
    pub experience: u64,
    /// Cached level; may lag behind `experience`
    pub level: u64,
}

impl UserLevel {
    /// The level `experience` actually corresponds to.
    pub fn computed_level(&self) -> u64 {
        level_from_experience(self.experience)
    }

    /// True when the cached level disagrees with the experience total.
    pub fn is_level_stale(&self) -> bool {
        self.computed_level() != self.level
    }
}

/// Message and voice counters for one user in one week bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyActivity {
    /// Guild the activity happened in
    pub guild_id: GuildId,
    /// Active user
    pub user_id: UserId,
    /// `YYYY_WW` bucket
    pub week: String,
    /// Messages sent during the week
    pub messages: u64,
    /// Minutes spent in an eligible voice state during the week
    pub minutes_in_voice: u64,
}

/// Which weekly counter an operation concerns.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum ActivityKind {
    /// Message count
    #[display("messages")]
    Messages,
    /// Voice minutes
    #[display("voice")]
    Voice,
}

/// Sort key for level leaderboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LeaderboardOrder {
    /// Highest experience first
    #[default]
    Experience,
    /// Highest cached level first, experience breaking ties
    Level,
}

/// How an administrator changes a user's experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperienceChange {
    /// Add (or, when negative, subtract) experience; the total never drops below zero
    Increment(i64),
    /// Replace the total
    Set(u64),
}

/// A role granted while a member's custom status contains a trigger text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRole {
    /// Row id
    pub id: i64,
    /// Owning guild
    pub guild_id: GuildId,
    /// Role to grant
    pub role_id: RoleId,
    /// Trigger text, matched case-insensitively as a substring
    pub required_text: String,
    /// Embed announced when the role is granted
    pub embed_name: Option<String>,
    /// Channel the embed is announced in
    pub channel_id: Option<ChannelId>,
}

impl StatusRole {
    /// Whether `status` triggers this role.
    ///
    /// # Examples
    ///
    /// ```
    /// use kbbq_core::{GuildId, RoleId, StatusRole};
    ///
    /// let role = StatusRole {
    ///     id: 1,
    ///     guild_id: GuildId(1),
    ///     role_id: RoleId(2),
    ///     required_text: "Chess".into(),
    ///     embed_name: None,
    ///     channel_id: None,
    /// };
    /// assert!(role.matches("playing CHESS tonight"));
    /// assert!(!role.matches("checkers"));
    /// ```
    pub fn matches(&self, status: &str) -> bool {
        status
            .to_lowercase()
            .contains(&self.required_text.to_lowercase())
    }

    /// The announcement target, present only when both halves are configured.
    pub fn announcement(&self) -> Option<(ChannelId, &str)> {
        match (&self.embed_name, self.channel_id) {
            (Some(name), Some(channel)) => Some((channel, name.as_str())),
            _ => None,
        }
    }
}

/// Insert form of [`StatusRole`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStatusRole {
    /// Owning guild
    pub guild_id: GuildId,
    /// Role to grant
    pub role_id: RoleId,
    /// Trigger text
    pub required_text: String,
    /// Embed announced when the role is granted
    pub embed_name: Option<String>,
    /// Channel the embed is announced in
    pub channel_id: Option<ChannelId>,
}

/// A rung of a guild's level-role ladder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRole {
    /// Row id
    pub id: i64,
    /// Owning guild
    pub guild_id: GuildId,
    /// Role granted at or above `required_level`
    pub role_id: RoleId,
    /// Minimum level
    pub required_level: u64,
}

/// Insert form of [`LevelRole`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLevelRole {
    /// Owning guild
    pub guild_id: GuildId,
    /// Role granted at or above `required_level`
    pub role_id: RoleId,
    /// Minimum level
    pub required_level: u64,
}

/// A stored message template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    /// Owning guild
    pub guild_id: GuildId,
    /// Name, unique per guild
    pub name: String,
    /// Raw create-message body containing `{{user}}`-style placeholders
    pub payload: serde_json::Value,
}

/// A link button attached to an [`Embed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageComponent {
    /// Row id
    pub id: i64,
    /// Owning guild
    pub guild_id: GuildId,
    /// Embed the button belongs to
    pub embed_name: String,
    /// Zero-based position among the embed's buttons
    pub position: u32,
    /// Button label
    pub label: String,
    /// Link target
    pub url: String,
    /// Optional emoji
    pub emoji: Option<ButtonEmoji>,
}

/// Insert form of [`MessageComponent`]; the position is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessageComponent {
    /// Owning guild
    pub guild_id: GuildId,
    /// Embed the button belongs to
    pub embed_name: String,
    /// Button label
    pub label: String,
    /// Link target
    pub url: String,
    /// Optional emoji
    pub emoji: Option<ButtonEmoji>,
}

/// An embed delivered to every member who joins a guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomeMessage {
    /// Row id
    pub id: i64,
    /// Owning guild
    pub guild_id: GuildId,
    /// Channel to post in
    pub channel_id: ChannelId,
    /// Embed to post
    pub embed_name: String,
    /// Delete the posted message after this many seconds
    pub expiry_secs: Option<u64>,
}

/// Insert form of [`WelcomeMessage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWelcomeMessage {
    /// Owning guild
    pub guild_id: GuildId,
    /// Channel to post in
    pub channel_id: ChannelId,
    /// Embed to post
    pub embed_name: String,
    /// Delete the posted message after this many seconds
    pub expiry_secs: Option<u64>,
}
