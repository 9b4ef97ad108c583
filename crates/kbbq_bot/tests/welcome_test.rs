mod test_utils;

use kbbq_core::{
    parse_button_emoji, ChannelId, Embed, GuildId, NewMessageComponent, NewWelcomeMessage, UserId,
};
use kbbq_interface::{EmbedRepository, MemberSnapshot, WelcomeMessageRepository};
use serde_json::json;
use test_utils::{fixed_config, harness, Harness};

const GUILD: GuildId = GuildId(10);

fn newcomer() -> MemberSnapshot {
    MemberSnapshot::new(
        UserId(5),
        "ferris".to_string(),
        Some(42),
        Some("abc".to_string()),
        None,
        Default::default(),
    )
}

async fn greeting(h: &Harness, name: &str, channel: u64, expiry_secs: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    h.repository
        .create_welcome_message(NewWelcomeMessage {
            guild_id: GUILD,
            channel_id: ChannelId(channel),
            embed_name: name.to_string(),
            expiry_secs,
        })
        .await?;
    Ok(())
}

async fn embed(h: &Harness, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    h.repository
        .upsert_embed(Embed {
            guild_id: GUILD,
            name: name.to_string(),
            payload: json!({
                "content": "Hi {{user}}",
                "embeds": [{ "title": "{{tag}}", "thumbnail": { "url": "{{avatar}}" } }],
            }),
        })
        .await?;
    Ok(())
}

#[tokio::test]
async fn test_welcome_renders_placeholders_and_buttons() -> Result<(), Box<dyn std::error::Error>> {
    let h = harness(fixed_config(20, 0));
    embed(&h, "hello").await?;
    h.repository
        .add_component(NewMessageComponent {
            guild_id: GUILD,
            embed_name: "hello".to_string(),
            label: "Rules".to_string(),
            url: "https://example.com/rules".to_string(),
            emoji: Some(parse_button_emoji("📜")?),
        })
        .await?;
    greeting(&h, "hello", 55, None).await?;

    let summary = h.engines.welcome().handle_member_join(GUILD, &newcomer()).await?;
    assert_eq!(summary.sent, 1);

    let sent = h.api.sent();
    let payload = &sent[0].payload;
    assert_eq!(sent[0].channel_id, ChannelId(55));
    assert_eq!(payload["content"], "Hi <@5>");
    assert_eq!(payload["embeds"][0]["title"], "ferris#0042");
    assert_eq!(
        payload["embeds"][0]["thumbnail"]["url"],
        "https://cdn.discordapp.com/avatars/5/abc.png"
    );
    assert_eq!(payload["allowed_mentions"], json!({ "parse": [], "users": ["5"] }));
    let button = &payload["components"][0]["components"][0];
    assert_eq!(button["label"], "Rules");
    assert_eq!(button["style"], 5);
    Ok(())
}

#[tokio::test]
async fn test_welcome_for_deleted_embed_is_removed() -> Result<(), Box<dyn std::error::Error>> {
    let h = harness(fixed_config(20, 0));
    embed(&h, "hello").await?;
    greeting(&h, "gone", 55, None).await?;
    greeting(&h, "hello", 56, None).await?;

    let summary = h.engines.welcome().handle_member_join(GUILD, &newcomer()).await?;
    assert_eq!((summary.sent, summary.removed, summary.failed), (1, 1, 0));

    let remaining = h.repository.list_welcome_messages(GUILD).await?;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].embed_name, "hello");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_expiring_welcome_is_deleted() -> Result<(), Box<dyn std::error::Error>> {
    let h = harness(fixed_config(20, 0));
    embed(&h, "hello").await?;
    greeting(&h, "hello", 55, Some(30)).await?;

    let summary = h.engines.welcome().handle_member_join(GUILD, &newcomer()).await?;
    assert_eq!(summary.expiries.len(), 1);
    assert!(h.api.deleted().is_empty());

    for expiry in summary.expiries {
        expiry.await?;
    }
    let sent = h.api.sent();
    assert_eq!(h.api.deleted(), vec![(ChannelId(55), sent[0].message_id)]);
    Ok(())
}

#[tokio::test]
async fn test_no_welcome_messages_is_a_no_op() -> Result<(), Box<dyn std::error::Error>> {
    let h = harness(fixed_config(20, 0));
    let summary = h.engines.welcome().handle_member_join(GUILD, &newcomer()).await?;
    assert_eq!(summary.sent, 0);
    assert!(h.api.sent().is_empty());
    Ok(())
}
