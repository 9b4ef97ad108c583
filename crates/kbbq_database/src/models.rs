//! Diesel row types and their conversions to domain records.

use crate::schema::{
    embeds, level_roles, message_components, status_roles, user_levels, weekly_activities,
    welcome_messages,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use kbbq_core::{
    ButtonEmoji, ChannelId, Embed, GuildId, LevelRole, MessageComponent, RoleId, StatusRole,
    UserId, UserLevel, WeeklyActivity, WelcomeMessage,
};
use serde_json::Value as JsonValue;

fn unsigned(value: i64) -> u64 {
    value.max(0) as u64
}

pub(crate) fn signed(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Database row for the user_levels table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_levels)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserLevelRow {
    pub guild_id: i64,
    pub user_id: i64,
    pub experience: i64,
    pub level: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for the user_levels table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_levels)]
pub struct NewUserLevelRow {
    pub guild_id: i64,
    pub user_id: i64,
    pub experience: i64,
    pub level: i64,
}

impl From<UserLevelRow> for UserLevel {
    fn from(row: UserLevelRow) -> Self {
        Self {
            guild_id: GuildId::from_db(row.guild_id),
            user_id: UserId::from_db(row.user_id),
            experience: unsigned(row.experience),
            level: unsigned(row.level),
        }
    }
}

/// Database row for the weekly_activities table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = weekly_activities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WeeklyActivityRow {
    pub guild_id: i64,
    pub user_id: i64,
    pub week: String,
    pub messages: i64,
    pub minutes_in_voice: i64,
}

/// Insertable struct for the weekly_activities table.
pub type NewWeeklyActivityRow = WeeklyActivityRow;

impl From<WeeklyActivityRow> for WeeklyActivity {
    fn from(row: WeeklyActivityRow) -> Self {
        Self {
            guild_id: GuildId::from_db(row.guild_id),
            user_id: UserId::from_db(row.user_id),
            week: row.week,
            messages: unsigned(row.messages),
            minutes_in_voice: unsigned(row.minutes_in_voice),
        }
    }
}

/// Database row for the status_roles table.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = status_roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StatusRoleRow {
    pub id: i64,
    pub guild_id: i64,
    pub role_id: i64,
    pub required_text: String,
    pub embed_name: Option<String>,
    pub channel_id: Option<i64>,
}

/// Insertable struct for the status_roles table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = status_roles)]
pub struct NewStatusRoleRow {
    pub guild_id: i64,
    pub role_id: i64,
    pub required_text: String,
    pub embed_name: Option<String>,
    pub channel_id: Option<i64>,
}

impl From<StatusRoleRow> for StatusRole {
    fn from(row: StatusRoleRow) -> Self {
        Self {
            id: row.id,
            guild_id: GuildId::from_db(row.guild_id),
            role_id: RoleId::from_db(row.role_id),
            required_text: row.required_text,
            embed_name: row.embed_name,
            channel_id: row.channel_id.map(ChannelId::from_db),
        }
    }
}

impl From<kbbq_core::NewStatusRole> for NewStatusRoleRow {
    fn from(role: kbbq_core::NewStatusRole) -> Self {
        Self {
            guild_id: role.guild_id.to_db(),
            role_id: role.role_id.to_db(),
            required_text: role.required_text,
            embed_name: role.embed_name,
            channel_id: role.channel_id.map(ChannelId::to_db),
        }
    }
}

/// Database row for the level_roles table.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = level_roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LevelRoleRow {
    pub id: i64,
    pub guild_id: i64,
    pub role_id: i64,
    pub required_level: i64,
}

/// Insertable struct for the level_roles table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = level_roles)]
pub struct NewLevelRoleRow {
    pub guild_id: i64,
    pub role_id: i64,
    pub required_level: i64,
}

impl From<LevelRoleRow> for LevelRole {
    fn from(row: LevelRoleRow) -> Self {
        Self {
            id: row.id,
            guild_id: GuildId::from_db(row.guild_id),
            role_id: RoleId::from_db(row.role_id),
            required_level: unsigned(row.required_level),
        }
    }
}

impl From<kbbq_core::NewLevelRole> for NewLevelRoleRow {
    fn from(role: kbbq_core::NewLevelRole) -> Self {
        Self {
            guild_id: role.guild_id.to_db(),
            role_id: role.role_id.to_db(),
            required_level: signed(role.required_level),
        }
    }
}

/// Database row for the embeds table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = embeds)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EmbedRow {
    pub guild_id: i64,
    pub embed_name: String,
    pub message_payload: JsonValue,
}

impl From<EmbedRow> for Embed {
    fn from(row: EmbedRow) -> Self {
        Self {
            guild_id: GuildId::from_db(row.guild_id),
            name: row.embed_name,
            payload: row.message_payload,
        }
    }
}

impl From<Embed> for EmbedRow {
    fn from(embed: Embed) -> Self {
        Self {
            guild_id: embed.guild_id.to_db(),
            embed_name: embed.name,
            message_payload: embed.payload,
        }
    }
}

/// Database row for the message_components table.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = message_components)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MessageComponentRow {
    pub id: i64,
    pub guild_id: i64,
    pub embed_name: String,
    pub position: i32,
    pub label: String,
    pub url: String,
    pub emoji_name: Option<String>,
    pub emoji_id: Option<i64>,
    pub emoji_animated: bool,
}

/// Insertable struct for the message_components table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = message_components)]
pub struct NewMessageComponentRow {
    pub guild_id: i64,
    pub embed_name: String,
    pub position: i32,
    pub label: String,
    pub url: String,
    pub emoji_name: Option<String>,
    pub emoji_id: Option<i64>,
    pub emoji_animated: bool,
}

impl From<MessageComponentRow> for MessageComponent {
    fn from(row: MessageComponentRow) -> Self {
        let emoji = match (row.emoji_name, row.emoji_id) {
            (Some(name), Some(id)) => Some(ButtonEmoji::Custom {
                name,
                id: id as u64,
                animated: row.emoji_animated,
            }),
            (Some(name), None) => Some(ButtonEmoji::Unicode(name)),
            _ => None,
        };
        Self {
            id: row.id,
            guild_id: GuildId::from_db(row.guild_id),
            embed_name: row.embed_name,
            position: row.position.max(0) as u32,
            label: row.label,
            url: row.url,
            emoji,
        }
    }
}

impl NewMessageComponentRow {
    /// Row for `component` placed at `position`.
    pub fn at_position(component: kbbq_core::NewMessageComponent, position: i32) -> Self {
        let (emoji_name, emoji_id, emoji_animated) = match component.emoji {
            Some(ButtonEmoji::Custom { name, id, animated }) => (Some(name), Some(id as i64), animated),
            Some(ButtonEmoji::Unicode(name)) => (Some(name), None, false),
            None => (None, None, false),
        };
        Self {
            guild_id: component.guild_id.to_db(),
            embed_name: component.embed_name,
            position,
            label: component.label,
            url: component.url,
            emoji_name,
            emoji_id,
            emoji_animated,
        }
    }
}

/// Database row for the welcome_messages table.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = welcome_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WelcomeMessageRow {
    pub id: i64,
    pub guild_id: i64,
    pub channel_id: i64,
    pub embed_name: String,
    pub expiry_secs: Option<i64>,
}

/// Insertable struct for the welcome_messages table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = welcome_messages)]
pub struct NewWelcomeMessageRow {
    pub guild_id: i64,
    pub channel_id: i64,
    pub embed_name: String,
    pub expiry_secs: Option<i64>,
}

impl From<WelcomeMessageRow> for WelcomeMessage {
    fn from(row: WelcomeMessageRow) -> Self {
        Self {
            id: row.id,
            guild_id: GuildId::from_db(row.guild_id),
            channel_id: ChannelId::from_db(row.channel_id),
            embed_name: row.embed_name,
            expiry_secs: row.expiry_secs.map(unsigned),
        }
    }
}

impl From<kbbq_core::NewWelcomeMessage> for NewWelcomeMessageRow {
    fn from(message: kbbq_core::NewWelcomeMessage) -> Self {
        Self {
            guild_id: message.guild_id.to_db(),
            channel_id: message.channel_id.to_db(),
            embed_name: message.embed_name,
            expiry_secs: message.expiry_secs.map(signed),
        }
    }
}
