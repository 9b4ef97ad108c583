mod test_utils;

use kbbq_bot::{
    Command, CommandContext, CommandReply, ExperienceAction, LeaderboardKind, Metric,
    COLOR_SUCCESS, COLOR_WARNING,
};
use kbbq_core::{
    current_week, ActivityKind, ChannelId, ExperienceChange, GuildId, NewLevelRole, RoleId, UserId,
};
use kbbq_interface::{
    ActivityRepository, EmbedRepository, LevelRoleRepository, LevelingRepository,
    StatusRoleRepository,
};
use test_utils::{fixed_config, harness, member, Harness};

const GUILD: GuildId = GuildId(10);
const ADMIN: UserId = UserId(1);

fn context(guild_id: Option<GuildId>) -> CommandContext {
    CommandContext {
        guild_id,
        invoker: member(ADMIN, &[]),
        shard: 0,
    }
}

async fn run(h: &Harness, command: Command) -> Result<CommandReply, Box<dyn std::error::Error>> {
    Ok(h.engines.commands().execute(&context(Some(GUILD)), command).await?)
}

#[tokio::test]
async fn test_ping_counts_as_success() -> Result<(), Box<dyn std::error::Error>> {
    let h = harness(fixed_config(20, 0));
    let reply = run(&h, Command::Ping).await?;
    assert_eq!(reply.title, "Pong!");
    assert_eq!(
        h.metrics.value(
            Metric::CommandsUsed,
            &[("command", "ping"), ("type", "chat_input"), ("success", "true"), ("shard", "0")]
        ),
        1.0
    );
    Ok(())
}

#[tokio::test]
async fn test_commands_outside_guilds_are_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let h = harness(fixed_config(20, 0));
    let reply = h.engines.commands().execute(&context(None), Command::Ping).await?;
    assert_eq!(reply.color, COLOR_WARNING);
    assert!(reply.ephemeral);
    assert_eq!(
        h.metrics.value(
            Metric::CommandsUsed,
            &[("command", "ping"), ("type", "chat_input"), ("success", "false"), ("shard", "0")]
        ),
        1.0
    );
    Ok(())
}

#[tokio::test]
async fn test_edit_experience_clamps_and_syncs_level() -> Result<(), Box<dyn std::error::Error>> {
    let h = harness(fixed_config(20, 0));
    let target = UserId(2);
    h.repository
        .upsert_level_role(NewLevelRole {
            guild_id: GUILD,
            role_id: RoleId(500),
            required_level: 12,
        })
        .await?;
    h.api.set_roles(GUILD, &[RoleId(500)]);
    h.api.add_member(GUILD, target, &[]);

    let set = run(
        &h,
        Command::EditExperience {
            user: target,
            action: ExperienceAction::Set,
            amount: 10_000,
        },
    )
    .await?;
    assert_eq!(set.color, COLOR_SUCCESS);
    assert!(set.description.contains("**10000** experience (level **12**)"));
    assert_eq!(h.api.member_roles(GUILD, target).len(), 1);

    run(
        &h,
        Command::EditExperience {
            user: target,
            action: ExperienceAction::Remove,
            amount: 50_000,
        },
    )
    .await?;
    let record = h.repository.get_experience(GUILD, target).await?.ok_or("no level row")?;
    assert_eq!((record.experience, record.level), (0, 0));
    assert!(h.api.member_roles(GUILD, target).is_empty());
    Ok(())
}

#[tokio::test]
async fn test_level_reports_progress() -> Result<(), Box<dyn std::error::Error>> {
    let h = harness(fixed_config(20, 0));
    let reply = run(&h, Command::Level { user: None }).await?;
    assert_eq!(reply.title, "No experience yet");

    h.repository
        .upsert_experience(GUILD, ADMIN, ExperienceChange::Set(10_050))
        .await?;
    let reply = run(&h, Command::Level { user: Some(ADMIN) }).await?;
    assert_eq!(reply.title, "Level 12");
    assert!(reply.description.contains("(rank #1)"));
    assert!(reply.description.contains("**10050** experience"));
    Ok(())
}

#[tokio::test]
async fn test_leaderboard_appends_invoker_neighbourhood() -> Result<(), Box<dyn std::error::Error>> {
    let h = harness(fixed_config(20, 0));
    for user in 2..=12u64 {
        h.repository
            .upsert_experience(GUILD, UserId(user), ExperienceChange::Set(1_000 + user * 10))
            .await?;
    }
    h.repository
        .upsert_experience(GUILD, ADMIN, ExperienceChange::Set(5))
        .await?;

    let reply = run(&h, Command::Leaderboard(LeaderboardKind::Levels)).await?;
    let lines: Vec<&str> = reply.description.lines().collect();
    assert!(lines[0].starts_with("`#1` <@12>"));
    assert!(lines[9].starts_with("`#10` <@3>"));
    assert_eq!(lines[10], "━━━━━━━━━━━━━━");
    assert!(lines[11].starts_with("`#11` <@2>"));
    assert!(lines[12].starts_with("`#12` <@1>"));
    assert_eq!(
        h.metrics.value(Metric::UserLevels, &[("guildId", "10"), ("shard", "0")]),
        12.0
    );
    Ok(())
}

#[tokio::test]
async fn test_weekly_leaderboard_uses_current_week() -> Result<(), Box<dyn std::error::Error>> {
    let h = harness(fixed_config(20, 0));
    let week = current_week();
    h.repository
        .record_activity(GUILD, UserId(2), &week, ActivityKind::Voice, 30)
        .await?;
    h.repository
        .record_activity(GUILD, UserId(3), &week, ActivityKind::Voice, 45)
        .await?;
    h.repository
        .record_activity(GUILD, UserId(4), "2001_01", ActivityKind::Voice, 999)
        .await?;

    let reply = run(&h, Command::Leaderboard(LeaderboardKind::Voice)).await?;
    assert_eq!(reply.title, "Voice leaderboard");
    assert!(reply.description.starts_with("`#1` <@3> · 45 minutes\n`#2` <@2> · 30 minutes"));
    assert!(!reply.description.contains("<@4>"));
    Ok(())
}

#[tokio::test]
async fn test_status_role_validation_and_listing() -> Result<(), Box<dyn std::error::Error>> {
    let h = harness(fixed_config(20, 0));

    let unpaired = run(
        &h,
        Command::StatusRoleCreate {
            role: RoleId(300),
            text: "chess".to_string(),
            channel: None,
            embed: Some("club".to_string()),
        },
    )
    .await?;
    assert_eq!(unpaired.color, COLOR_WARNING);
    assert!(unpaired.description.contains("needs a channel"));

    let created = run(
        &h,
        Command::StatusRoleCreate {
            role: RoleId(300),
            text: "chess".to_string(),
            channel: None,
            embed: None,
        },
    )
    .await?;
    assert_eq!(created.color, COLOR_SUCCESS);

    let listed = run(&h, Command::StatusRoleList).await?;
    assert!(listed.description.contains("`chess`: <@&300>"));

    let id = h.repository.list_status_roles(GUILD).await?[0].id;
    let deleted = run(&h, Command::StatusRoleDelete { id }).await?;
    assert_eq!(deleted.color, COLOR_SUCCESS);
    let again = run(&h, Command::StatusRoleDelete { id }).await?;
    assert_eq!(again.color, COLOR_WARNING);
    Ok(())
}

#[tokio::test]
async fn test_embed_commands() -> Result<(), Box<dyn std::error::Error>> {
    let h = harness(fixed_config(20, 0));

    let invalid = run(
        &h,
        Command::EmbedCreate {
            name: "rules".to_string(),
            json: "{not json".to_string(),
        },
    )
    .await?;
    assert_eq!(invalid.color, COLOR_WARNING);

    run(
        &h,
        Command::EmbedCreate {
            name: "rules".to_string(),
            json: r#"{"content":"Read the rules, {{user}}"}"#.to_string(),
        },
    )
    .await?;

    let long_label = run(
        &h,
        Command::EmbedButtonAdd {
            name: "rules".to_string(),
            label: "x".repeat(81),
            url: "https://example.com".to_string(),
            emoji: None,
        },
    )
    .await?;
    assert_eq!(long_label.color, COLOR_WARNING);

    let bad_emoji = run(
        &h,
        Command::EmbedButtonAdd {
            name: "rules".to_string(),
            label: "Docs".to_string(),
            url: "https://example.com".to_string(),
            emoji: Some("not an emoji".to_string()),
        },
    )
    .await?;
    assert_eq!(bad_emoji.color, COLOR_WARNING);

    for label in ["First", "Second"] {
        let added = run(
            &h,
            Command::EmbedButtonAdd {
                name: "rules".to_string(),
                label: label.to_string(),
                url: "https://example.com".to_string(),
                emoji: Some("<:ferris:123>".to_string()),
            },
        )
        .await?;
        assert_eq!(added.color, COLOR_SUCCESS);
    }
    let first = h.repository.list_components(GUILD, "rules").await?[0].id;
    run(&h, Command::EmbedButtonRemove { id: first }).await?;
    let components = h.repository.list_components(GUILD, "rules").await?;
    assert_eq!(components.len(), 1);
    assert_eq!((components[0].label.as_str(), components[0].position), ("Second", 0));

    let sent = run(
        &h,
        Command::EmbedSend {
            name: "rules".to_string(),
            channel: ChannelId(55),
        },
    )
    .await?;
    assert_eq!(sent.color, COLOR_SUCCESS);
    assert_eq!(h.api.sent()[0].payload["content"], "Read the rules, <@1>");

    let missing = run(
        &h,
        Command::EmbedSend {
            name: "nope".to_string(),
            channel: ChannelId(55),
        },
    )
    .await?;
    assert_eq!(missing.color, COLOR_WARNING);

    run(&h, Command::EmbedDelete { name: "rules".to_string() }).await?;
    assert!(h.repository.get_embed(GUILD, "rules").await?.is_none());
    assert!(h.repository.list_components(GUILD, "rules").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_welcome_message_requires_embed() -> Result<(), Box<dyn std::error::Error>> {
    let h = harness(fixed_config(20, 0));
    let reply = run(
        &h,
        Command::WelcomeCreate {
            embed: "hello".to_string(),
            channel: ChannelId(55),
            expiry_secs: Some(60),
        },
    )
    .await?;
    assert_eq!(reply.color, COLOR_WARNING);
    assert_eq!(reply.title, "Unknown embed");
    Ok(())
}

#[tokio::test]
async fn test_level_role_commands() -> Result<(), Box<dyn std::error::Error>> {
    let h = harness(fixed_config(20, 0));
    let zero = run(&h, Command::LevelRoleSet { role: RoleId(500), level: 0 }).await?;
    assert_eq!(zero.color, COLOR_WARNING);

    run(&h, Command::LevelRoleSet { role: RoleId(501), level: 10 }).await?;
    run(&h, Command::LevelRoleSet { role: RoleId(500), level: 5 }).await?;
    let listed = run(&h, Command::LevelRoleList).await?;
    let lines: Vec<&str> = listed.description.lines().collect();
    assert!(lines[0].ends_with("level 5: <@&500>"));
    assert!(lines[1].ends_with("level 10: <@&501>"));
    Ok(())
}

#[tokio::test]
async fn test_store_failures_propagate() {
    let h = harness(fixed_config(20, 0));
    h.repository.set_unavailable(GUILD, true);
    let result = h
        .engines
        .commands()
        .execute(&context(Some(GUILD)), Command::StatusRoleList)
        .await;
    assert!(result.is_err());
    assert_eq!(
        h.metrics.value(
            Metric::CommandsUsed,
            &[("command", "status-role"), ("type", "chat_input"), ("success", "false"), ("shard", "0")]
        ),
        1.0
    );
}
