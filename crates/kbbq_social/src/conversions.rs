//! Serenity models reduced to the snapshots the engines consume.

use kbbq_bot::{GuildSnapshot, IncomingMessage};
use kbbq_cache::VoiceStateSnapshot;
use kbbq_core::{ChannelId, GuildId, MessageId, RoleId, UserId};
use kbbq_interface::{GuildRole, MemberSnapshot};
use serenity::all::{Activity, ActivityType, Guild, Member, Message, Role, VoiceState};

/// Convert a serenity guild id.
pub fn guild_id(id: serenity::all::GuildId) -> GuildId {
    GuildId(id.get())
}

/// Convert a serenity user id.
pub fn user_id(id: serenity::all::UserId) -> UserId {
    UserId(id.get())
}

/// Convert a serenity role id.
pub fn role_id(id: serenity::all::RoleId) -> RoleId {
    RoleId(id.get())
}

/// Convert a serenity channel id.
pub fn channel_id(id: serenity::all::ChannelId) -> ChannelId {
    ChannelId(id.get())
}

/// Role metadata for the role cache.
pub fn guild_role(role: &Role) -> GuildRole {
    GuildRole::new(role_id(role.id), role.name.clone(), role.position)
}

/// The member fields the engines read.
pub fn member_snapshot(member: &Member) -> MemberSnapshot {
    MemberSnapshot::new(
        user_id(member.user.id),
        member.user.name.clone(),
        member.user.discriminator.map(|d| d.get()),
        member.user.avatar.map(|hash| hash.to_string()),
        member.avatar.map(|hash| hash.to_string()),
        member.roles.iter().copied().map(role_id).collect(),
    )
}

/// The voice-state fields that decide reward eligibility.
pub fn voice_snapshot(state: &VoiceState) -> VoiceStateSnapshot {
    VoiceStateSnapshot {
        user_id: user_id(state.user_id),
        in_channel: state.channel_id.is_some(),
        self_mute: state.self_mute,
        self_deaf: state.self_deaf,
        mute: state.mute,
        deaf: state.deaf,
    }
}

/// Everything guild-create populates the caches with.
pub fn guild_snapshot(guild: &Guild) -> GuildSnapshot {
    GuildSnapshot {
        guild_id: guild_id(guild.id),
        name: guild.name.clone(),
        owner_id: user_id(guild.owner_id),
        member_count: guild.member_count,
        roles: guild.roles.values().map(guild_role).collect(),
        voice_states: guild.voice_states.values().map(voice_snapshot).collect(),
    }
}

/// A chat message as seen by the leveling engine.
pub fn incoming_message(message: &Message) -> IncomingMessage {
    IncomingMessage {
        guild_id: message.guild_id.map(guild_id),
        channel_id: channel_id(message.channel_id),
        message_id: MessageId(message.id.get()),
        author_id: user_id(message.author.id),
        author_is_bot: message.author.bot,
    }
}

/// Text of the custom-status activity, if the member has one.
pub fn custom_status(activities: &[Activity]) -> Option<&str> {
    activities
        .iter()
        .find(|activity| activity.kind == ActivityType::Custom)
        .and_then(|activity| activity.state.as_deref())
}
