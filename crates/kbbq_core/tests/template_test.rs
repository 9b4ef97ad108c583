use kbbq_core::{
    action_rows, build_delivery_payload, parse_button_emoji, parse_payload, render, ButtonEmoji,
    GuildId, LevelChange, MessageComponent, RoleId, TemplateVars, UserId,
};
use serde_json::json;

fn vars() -> TemplateVars {
    TemplateVars::for_member(GuildId(1), UserId(42), "ada", Some(7), None, Some("hash"))
}

fn button(position: u32) -> MessageComponent {
    MessageComponent {
        id: position as i64,
        guild_id: GuildId(1),
        embed_name: "rules".into(),
        position,
        label: format!("b{position}"),
        url: "https://example.com".into(),
        emoji: None,
    }
}

#[test]
fn test_member_vars() {
    let vars = vars();
    assert_eq!(vars.user, "<@42>");
    assert_eq!(vars.tag, "ada#0007");
    assert_eq!(vars.avatar, "https://cdn.discordapp.com/avatars/42/hash.png");
}

#[test]
fn test_render_replaces_every_occurrence() -> Result<(), Box<dyn std::error::Error>> {
    let payload = json!({
        "content": "{{user}} {{user}}",
        "embeds": [{"title": "{{tag}}", "thumbnail": {"url": "{{avatar}}"}}]
    });
    let out = render(&payload, &vars())?;
    assert_eq!(out["content"], "<@42> <@42>");
    assert_eq!(out["embeds"][0]["title"], "ada#0007");
    assert_eq!(
        out["embeds"][0]["thumbnail"]["url"],
        "https://cdn.discordapp.com/avatars/42/hash.png"
    );
    Ok(())
}

#[test]
fn test_render_breaking_json_is_an_error() {
    let mut vars = vars();
    vars.tag = "bad\"name".into();
    assert!(render(&json!({"content": "{{tag}}"}), &vars).is_err());
}

#[test]
fn test_parse_payload_rejects_non_objects() {
    assert!(parse_payload("{\"content\": \"hi\"}").is_ok());
    assert!(parse_payload("[1, 2]").is_err());
    assert!(parse_payload("{not json").is_err());
}

#[test]
fn test_action_rows_hold_five_buttons_in_order() {
    let buttons: Vec<MessageComponent> = (0..7).rev().map(button).collect();
    let rows = action_rows(&buttons);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["components"].as_array().map(Vec::len), Some(5));
    assert_eq!(rows[1]["components"].as_array().map(Vec::len), Some(2));
    assert_eq!(rows[0]["components"][0]["label"], "b0");
    assert_eq!(rows[1]["components"][1]["label"], "b6");
}

#[test]
fn test_delivery_payload_pings_only_target() -> Result<(), Box<dyn std::error::Error>> {
    let payload = json!({"content": "welcome {{user}}", "allowed_mentions": {"parse": ["everyone"]}});
    let out = build_delivery_payload(&payload, &[button(0)], UserId(42), &vars())?;
    assert_eq!(out["content"], "welcome <@42>");
    assert_eq!(out["allowed_mentions"], json!({"parse": [], "users": ["42"]}));
    assert_eq!(out["components"][0]["type"], 1);
    Ok(())
}

#[test]
fn test_button_emoji_parsing() -> Result<(), Box<dyn std::error::Error>> {
    assert_eq!(
        parse_button_emoji("<:wave:55>")?,
        ButtonEmoji::Custom { name: "wave".into(), id: 55, animated: false }
    );
    assert_eq!(parse_button_emoji("🎉")?, ButtonEmoji::Unicode("🎉".into()));
    assert!(parse_button_emoji("").is_err());
    assert!(parse_button_emoji("<:wave>").is_err());
    Ok(())
}

#[test]
fn test_level_down_notice_without_roles() {
    let change = LevelChange {
        user_id: UserId(3),
        previous_level: 9,
        new_level: 8,
        added: vec![],
        removed: vec![],
    };
    assert_eq!(change.notice(), "<@3> has leveled down to level 8!");
}

#[test]
fn test_notice_pluralises_roles() {
    let change = LevelChange {
        user_id: UserId(3),
        previous_level: 1,
        new_level: 10,
        added: vec![RoleId(1), RoleId(2)],
        removed: vec![],
    };
    assert_eq!(
        change.notice(),
        "<@3> has leveled up to level 10 and earned the <@&1>, <@&2> roles!"
    );
}
