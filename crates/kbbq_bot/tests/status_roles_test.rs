mod test_utils;

use kbbq_bot::{Metric, StatusOutcome};
use kbbq_core::{ChannelId, Embed, GuildId, NewStatusRole, RoleId, UserId};
use kbbq_error::PlatformErrorKind;
use kbbq_interface::{EmbedRepository, StatusRoleRepository};
use serde_json::json;
use std::collections::BTreeSet;
use test_utils::{fixed_config, harness, Harness};

const GUILD: GuildId = GuildId(10);
const USER: UserId = UserId(1);

async fn status_role(
    h: &Harness,
    role: u64,
    text: &str,
    announcement: Option<(&str, u64)>,
) -> Result<(), Box<dyn std::error::Error>> {
    h.repository
        .upsert_status_role(NewStatusRole {
            guild_id: GUILD,
            role_id: RoleId(role),
            required_text: text.to_string(),
            embed_name: announcement.map(|(name, _)| name.to_string()),
            channel_id: announcement.map(|(_, channel)| ChannelId(channel)),
        })
        .await?;
    Ok(())
}

#[tokio::test]
async fn test_clearing_status_removes_role_with_one_edit() -> Result<(), Box<dyn std::error::Error>> {
    let h = harness(fixed_config(20, 0));
    status_role(&h, 300, "chess", None).await?;
    h.api.set_roles(GUILD, &[RoleId(300)]);
    h.api.add_member(GUILD, USER, &[RoleId(7)]);
    let engine = h.engines.status_roles();

    let granted = engine.handle_presence(GUILD, USER, Some("playing chess")).await?;
    let StatusOutcome::Updated(grant) = granted else {
        panic!("expected a role grant, got {granted:?}");
    };
    assert_eq!(grant.added, BTreeSet::from([RoleId(300)]));
    assert_eq!(h.api.role_edits().len(), 1);

    let cleared = engine.handle_presence(GUILD, USER, None).await?;
    let StatusOutcome::Updated(removal) = cleared else {
        panic!("expected a role removal, got {cleared:?}");
    };
    assert_eq!(removal.removed, BTreeSet::from([RoleId(300)]));
    assert_eq!(h.api.role_edits().len(), 2);
    assert_eq!(h.api.member_roles(GUILD, USER), BTreeSet::from([RoleId(7)]));
    assert_eq!(h.metrics.value(Metric::StatusRoleUpdates, &[("guildId", "10")]), 2.0);
    Ok(())
}

#[tokio::test]
async fn test_match_is_case_insensitive_substring() -> Result<(), Box<dyn std::error::Error>> {
    let h = harness(fixed_config(20, 0));
    status_role(&h, 300, "Chess", None).await?;
    h.api.set_roles(GUILD, &[RoleId(300)]);
    h.api.add_member(GUILD, USER, &[]);

    h.engines
        .status_roles()
        .handle_presence(GUILD, USER, Some("I love CHESS openings"))
        .await?;
    assert_eq!(h.api.member_roles(GUILD, USER), BTreeSet::from([RoleId(300)]));
    Ok(())
}

#[tokio::test]
async fn test_changed_status_swaps_roles_in_one_edit() -> Result<(), Box<dyn std::error::Error>> {
    let h = harness(fixed_config(20, 0));
    status_role(&h, 300, "chess", None).await?;
    status_role(&h, 301, "checkers", None).await?;
    h.api.set_roles(GUILD, &[RoleId(300), RoleId(301)]);
    h.api.add_member(GUILD, USER, &[RoleId(7)]);
    let engine = h.engines.status_roles();

    engine.handle_presence(GUILD, USER, Some("chess")).await?;
    let outcome = engine.handle_presence(GUILD, USER, Some("checkers")).await?;
    let StatusOutcome::Updated(swap) = outcome else {
        panic!("expected a swap, got {outcome:?}");
    };
    assert_eq!(swap.added, BTreeSet::from([RoleId(301)]));
    assert_eq!(swap.removed, BTreeSet::from([RoleId(300)]));
    assert_eq!(h.api.role_edits().len(), 2);
    assert_eq!(
        h.api.member_roles(GUILD, USER),
        BTreeSet::from([RoleId(7), RoleId(301)])
    );
    Ok(())
}

#[tokio::test]
async fn test_unchanged_and_unmatched_statuses_make_no_calls() -> Result<(), Box<dyn std::error::Error>> {
    let h = harness(fixed_config(20, 0));
    status_role(&h, 300, "chess", None).await?;
    h.api.set_roles(GUILD, &[RoleId(300)]);
    h.api.add_member(GUILD, USER, &[]);
    let engine = h.engines.status_roles();

    assert_eq!(engine.handle_presence(GUILD, USER, Some("coding")).await?, StatusOutcome::Skipped);
    assert_eq!(engine.handle_presence(GUILD, USER, Some("coding")).await?, StatusOutcome::Unchanged);
    assert_eq!(engine.handle_presence(GUILD, USER, Some("")).await?, StatusOutcome::Skipped);
    assert_eq!(engine.handle_presence(GUILD, USER, None).await?, StatusOutcome::Unchanged);
    assert!(h.api.role_edits().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_stale_status_roles_are_deleted() -> Result<(), Box<dyn std::error::Error>> {
    let h = harness(fixed_config(20, 0));
    status_role(&h, 300, "chess", None).await?;
    status_role(&h, 999, "chess", None).await?;
    h.api.set_roles(GUILD, &[RoleId(300)]);
    h.api.add_member(GUILD, USER, &[]);

    h.engines
        .status_roles()
        .handle_presence(GUILD, USER, Some("chess"))
        .await?;

    let remaining = h.repository.list_status_roles(GUILD).await?;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].role_id, RoleId(300));
    assert_eq!(h.api.member_roles(GUILD, USER), BTreeSet::from([RoleId(300)]));
    Ok(())
}

#[tokio::test]
async fn test_announcement_is_sent_once_per_window() -> Result<(), Box<dyn std::error::Error>> {
    let h = harness(fixed_config(20, 0));
    h.repository
        .upsert_embed(Embed {
            guild_id: GUILD,
            name: "chess-club".to_string(),
            payload: json!({ "content": "Welcome to the club {{user}}" }),
        })
        .await?;
    status_role(&h, 300, "chess", Some(("chess-club", 55))).await?;
    h.api.set_roles(GUILD, &[RoleId(300)]);
    h.api.add_member(GUILD, USER, &[]);
    let engine = h.engines.status_roles();

    engine.handle_presence(GUILD, USER, Some("chess")).await?;
    engine.handle_presence(GUILD, USER, None).await?;
    engine.handle_presence(GUILD, USER, Some("chess again")).await?;

    let sent = h.api.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].channel_id, ChannelId(55));
    assert_eq!(sent[0].payload["content"], "Welcome to the club <@1>");
    assert_eq!(sent[0].payload["allowed_mentions"]["users"], json!(["1"]));
    assert_eq!(h.api.role_edits().len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_platform_failures_are_absorbed() -> Result<(), Box<dyn std::error::Error>> {
    let h = harness(fixed_config(20, 0));
    status_role(&h, 300, "chess", None).await?;
    h.api.set_roles(GUILD, &[RoleId(300)]);

    let gone = h
        .engines
        .status_roles()
        .handle_presence(GUILD, USER, Some("chess"))
        .await?;
    assert_eq!(gone, StatusOutcome::Skipped);

    h.api.add_member(GUILD, UserId(2), &[]);
    h.api.fail_role_edits(PlatformErrorKind::MissingPermissions("MANAGE_ROLES".into()));
    let denied = h
        .engines
        .status_roles()
        .handle_presence(GUILD, UserId(2), Some("chess"))
        .await?;
    assert_eq!(denied, StatusOutcome::Skipped);
    Ok(())
}

#[tokio::test]
async fn test_unclassified_failures_propagate() {
    let h = harness(fixed_config(20, 0));
    h.repository.set_unavailable(GUILD, true);
    let result = h
        .engines
        .status_roles()
        .handle_presence(GUILD, USER, Some("chess"))
        .await;
    assert!(result.is_err());
}
