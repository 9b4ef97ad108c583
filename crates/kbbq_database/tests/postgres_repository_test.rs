//! These tests need a disposable PostgreSQL database in `DATABASE_URL`.
//! Run with `cargo test -p kbbq_database -- --ignored`.

use kbbq_core::{
    ActivityKind, Embed, ExperienceChange, GuildId, LeaderboardOrder, NewMessageComponent, UserId,
};
use kbbq_database::{establish_pool, run_migrations, PostgresRepository};
use kbbq_interface::{ActivityRepository, EmbedRepository, LevelingRepository};

fn repository() -> Result<PostgresRepository, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL")?;
    let pool = establish_pool(&url, 4)?;
    let mut conn = pool.get()?;
    run_migrations(&mut conn)?;
    Ok(PostgresRepository::new(pool))
}

fn unique_guild() -> GuildId {
    GuildId(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(1),
    )
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_concurrent_increments() -> Result<(), Box<dyn std::error::Error>> {
    let repo = repository()?;
    let guild = unique_guild();
    let user = UserId(1);

    let mut handles = Vec::new();
    for _ in 0..20 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            repo.upsert_experience(guild, user, ExperienceChange::Increment(5))
                .await
        }));
    }
    for handle in handles {
        handle.await??;
    }

    let row = repo.get_experience(guild, user).await?;
    assert_eq!(row.map(|row| row.experience), Some(100));
    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_clamp_and_rank() -> Result<(), Box<dyn std::error::Error>> {
    let repo = repository()?;
    let guild = unique_guild();

    repo.upsert_experience(guild, UserId(1), ExperienceChange::Set(30))
        .await?;
    let row = repo
        .upsert_experience(guild, UserId(1), ExperienceChange::Increment(-100))
        .await?;
    assert_eq!(row.experience, 0);

    repo.increment_experience_batch(guild, &[UserId(2), UserId(3)], 40)
        .await?;
    assert_eq!(
        repo.rank(guild, UserId(1), LeaderboardOrder::Experience).await?,
        Some(3)
    );
    let top = repo
        .leaderboard(guild, LeaderboardOrder::Experience, 0, 2)
        .await?;
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].record().user_id, UserId(2));
    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_voice_minutes_batch() -> Result<(), Box<dyn std::error::Error>> {
    let repo = repository()?;
    let guild = unique_guild();
    let users = [UserId(1), UserId(2), UserId(3)];

    repo.record_voice_minutes_batch(guild, &users, "2024_10", 1)
        .await?;
    repo.record_voice_minutes_batch(guild, &users, "2024_10", 1)
        .await?;
    repo.record_activity(guild, UserId(1), "2024_10", ActivityKind::Messages, 1)
        .await?;

    let row = repo.get_activity(guild, UserId(1), "2024_10").await?;
    assert_eq!(row.as_ref().map(|row| row.minutes_in_voice), Some(2));
    assert_eq!(row.map(|row| row.messages), Some(1));
    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_concurrent_button_adds_get_distinct_positions() -> Result<(), Box<dyn std::error::Error>>
{
    let repo = repository()?;
    let guild = unique_guild();
    repo.upsert_embed(Embed {
        guild_id: guild,
        name: "rules".into(),
        payload: serde_json::json!({ "content": "Read the rules" }),
    })
    .await?;

    let mut handles = Vec::new();
    for i in 0..10 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            repo.add_component(NewMessageComponent {
                guild_id: guild,
                embed_name: "rules".into(),
                label: format!("link {i}"),
                url: format!("https://example.com/{i}"),
                emoji: None,
            })
            .await
        }));
    }
    for handle in handles {
        handle.await??;
    }

    let buttons = repo.list_components(guild, "rules").await?;
    let positions: Vec<u32> = buttons.iter().map(|button| button.position).collect();
    assert_eq!(positions, (0..10).collect::<Vec<u32>>());

    assert!(repo.remove_component(guild, buttons[3].id).await?);
    let positions: Vec<u32> = repo
        .list_components(guild, "rules")
        .await?
        .iter()
        .map(|button| button.position)
        .collect();
    assert_eq!(positions, (0..9).collect::<Vec<u32>>());
    Ok(())
}
