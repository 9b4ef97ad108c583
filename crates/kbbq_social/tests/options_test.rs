use kbbq_bot::{Command, ExperienceAction, LeaderboardKind};
use kbbq_core::{ChannelId, RoleId, UserId};
use kbbq_social::{command_definitions, parse_command, CommandOptions, OptionValue};
use serenity::all::CommandDataOption;

#[test]
fn test_simple_commands() {
    let none = CommandOptions::new();
    assert_eq!(parse_command("ping", &none).ok(), Some(Command::Ping));
    assert_eq!(parse_command("level", &none).ok(), Some(Command::Level { user: None }));
    assert_eq!(
        parse_command(
            "level",
            &CommandOptions::new().with("user", OptionValue::User(UserId(7)))
        )
        .ok(),
        Some(Command::Level {
            user: Some(UserId(7))
        })
    );
    assert_eq!(
        parse_command("leaderboard", &CommandOptions::new().with_subcommand("messages")).ok(),
        Some(Command::Leaderboard(LeaderboardKind::Messages))
    );
}

#[test]
fn test_edit_experience() {
    let options = CommandOptions::new()
        .with("user", OptionValue::User(UserId(2)))
        .with("action", OptionValue::String("remove".into()))
        .with("amount", OptionValue::Integer(50));
    assert_eq!(
        parse_command("edit-exp", &options).ok(),
        Some(Command::EditExperience {
            user: UserId(2),
            action: ExperienceAction::Remove,
            amount: 50,
        })
    );

    let negative = options.clone().with("amount", OptionValue::Integer(-5));
    assert!(parse_command("edit-exp", &negative).is_err());

    let unknown = options.with("action", OptionValue::String("double".into()));
    let err = parse_command("edit-exp", &unknown).err();
    assert!(err.is_some_and(|e| e.to_string().contains("unknown action `double`")));
}

#[test]
fn test_subcommands_with_optional_values() {
    let options = CommandOptions::new()
        .with_subcommand("create")
        .with("embed", OptionValue::String("rules".into()))
        .with("channel", OptionValue::Channel(ChannelId(55)));
    assert_eq!(
        parse_command("welcome-message", &options).ok(),
        Some(Command::WelcomeCreate {
            embed: "rules".into(),
            channel: ChannelId(55),
            expiry_secs: None,
        })
    );

    let options = CommandOptions::new()
        .with_subcommand("create")
        .with("role", OptionValue::Role(RoleId(300)))
        .with("text", OptionValue::String("chess".into()));
    assert_eq!(
        parse_command("status-role", &options).ok(),
        Some(Command::StatusRoleCreate {
            role: RoleId(300),
            text: "chess".into(),
            channel: None,
            embed: None,
        })
    );
}

#[test]
fn test_missing_and_unknown() {
    let err = parse_command("embed", &CommandOptions::new().with_subcommand("send")).err();
    assert!(err.is_some_and(|e| e.to_string().contains("missing option `name`")));

    assert!(parse_command("teleport", &CommandOptions::new()).is_err());
    assert!(parse_command("embed", &CommandOptions::new().with_subcommand("explode")).is_err());
}

#[test]
fn test_flattens_interaction_options() -> Result<(), Box<dyn std::error::Error>> {
    let raw: Vec<CommandDataOption> = serde_json::from_value(serde_json::json!([{
        "name": "set",
        "type": 1,
        "options": [
            { "name": "role", "type": 8, "value": "500" },
            { "name": "level", "type": 4, "value": 5 }
        ]
    }]))?;
    let options = CommandOptions::from_interaction(&raw);
    assert_eq!(options.subcommand(), Some("set"));
    assert_eq!(
        parse_command("level-role", &options).ok(),
        Some(Command::LevelRoleSet {
            role: RoleId(500),
            level: 5,
        })
    );
    Ok(())
}

#[test]
fn test_registered_names_are_parseable() -> Result<(), Box<dyn std::error::Error>> {
    let mut names = Vec::new();
    for definition in command_definitions() {
        let json = serde_json::to_value(&definition)?;
        if let Some(name) = json.get("name").and_then(|name| name.as_str()) {
            names.push(name.to_string());
        }
    }
    assert_eq!(
        names,
        [
            "ping",
            "level",
            "leaderboard",
            "edit-exp",
            "status-role",
            "level-role",
            "embed",
            "welcome-message"
        ]
    );
    Ok(())
}
