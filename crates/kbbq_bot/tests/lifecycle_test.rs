mod test_utils;

use kbbq_bot::{GuildSnapshot, Metric};
use kbbq_cache::{VoiceChange, VoiceStateSnapshot};
use kbbq_core::{GuildId, RoleId, UserId};
use kbbq_interface::GuildRole;
use test_utils::{fixed_config, harness};

const GUILD: GuildId = GuildId(10);

fn snapshot() -> GuildSnapshot {
    GuildSnapshot {
        guild_id: GUILD,
        name: "Rustaceans".to_string(),
        owner_id: UserId(1),
        member_count: 250,
        roles: vec![GuildRole::new(RoleId(300), "chess".to_string(), 1)],
        voice_states: vec![
            VoiceStateSnapshot {
                user_id: UserId(2),
                in_channel: true,
                ..Default::default()
            },
            VoiceStateSnapshot {
                user_id: UserId(3),
                in_channel: true,
                self_deaf: true,
                ..Default::default()
            },
            VoiceStateSnapshot {
                user_id: UserId(4),
                in_channel: true,
                mute: true,
                ..Default::default()
            },
        ],
    }
}

#[tokio::test]
async fn test_guild_create_populates_caches() {
    let h = harness(fixed_config(20, 0));
    let lifecycle = h.engines.lifecycle();

    assert!(lifecycle.on_guild_create(snapshot(), 0).await);
    assert!(!lifecycle.on_guild_create(snapshot(), 0).await);

    let caches = h.context().caches();
    assert_eq!(caches.voice().participants(GUILD), vec![UserId(2)]);
    assert_eq!(caches.roles().contains(GUILD, RoleId(300)), Some(true));
    assert_eq!(caches.roles().contains(GUILD, RoleId(301)), Some(false));
    assert_eq!(lifecycle.guild_count(), 1);
    assert_eq!(h.metrics.value(Metric::GuildCount, &[("shard", "0")]), 1.0);
}

#[tokio::test]
async fn test_unavailable_guild_keeps_caches() {
    let h = harness(fixed_config(20, 0));
    let lifecycle = h.engines.lifecycle();
    lifecycle.on_guild_create(snapshot(), 0).await;

    lifecycle.on_guild_delete(GUILD, true, 0);
    assert!(h.context().caches().roles().is_populated(GUILD));

    h.context().caches().presence().observe(GUILD, UserId(2), Some("chess"));
    lifecycle.on_guild_delete(GUILD, false, 0);
    let caches = h.context().caches();
    assert!(!caches.roles().is_populated(GUILD));
    assert!(caches.voice().participants(GUILD).is_empty());
    assert_eq!(caches.presence().status(GUILD, UserId(2)), None);
    assert_eq!(lifecycle.guild_count(), 0);
    assert_eq!(h.metrics.value(Metric::GuildCount, &[("shard", "0")]), 0.0);
}

#[tokio::test]
async fn test_role_events_refresh_cache() {
    let h = harness(fixed_config(20, 0));
    let lifecycle = h.engines.lifecycle();
    lifecycle.on_guild_create(snapshot(), 0).await;

    lifecycle.on_role_upsert(GUILD, GuildRole::new(RoleId(301), "go".to_string(), 2));
    lifecycle.on_role_delete(GUILD, RoleId(300));

    let roles = h.context().caches().roles();
    assert_eq!(roles.contains(GUILD, RoleId(301)), Some(true));
    assert_eq!(roles.contains(GUILD, RoleId(300)), Some(false));
}

#[test]
fn test_voice_transitions() {
    let h = harness(fixed_config(20, 0));
    let lifecycle = h.engines.lifecycle();
    let joined = VoiceStateSnapshot {
        user_id: UserId(2),
        in_channel: true,
        ..Default::default()
    };

    assert_eq!(lifecycle.on_voice_state(GUILD, &joined), VoiceChange::Joined);
    assert_eq!(lifecycle.on_voice_state(GUILD, &joined), VoiceChange::Unchanged);
    assert_eq!(
        lifecycle.on_voice_state(
            GUILD,
            &VoiceStateSnapshot {
                self_mute: true,
                ..joined
            }
        ),
        VoiceChange::Left
    );
    assert_eq!(lifecycle.on_voice_state(GUILD, &joined), VoiceChange::Joined);
    assert_eq!(
        lifecycle.on_voice_state(
            GUILD,
            &VoiceStateSnapshot {
                in_channel: false,
                ..joined
            }
        ),
        VoiceChange::Left
    );
}
