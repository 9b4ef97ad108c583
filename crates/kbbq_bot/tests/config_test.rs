use kbbq_bot::{BotConfig, MAX_WINDOW_SECS};
use kbbq_core::ExperienceRange;

#[test]
fn test_empty_config_uses_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let config = BotConfig::from_toml("")?;
    assert_eq!(config, BotConfig::default());
    assert_eq!(config.leveling.message_cooldown_secs, 60);
    assert_eq!(config.leveling.message_experience, ExperienceRange::new(15, 30));
    assert_eq!(config.voice.experience, ExperienceRange::new(0, 25));
    assert_eq!(config.voice.minutes_per_tick, 1);
    assert_eq!(config.status_roles.embed_resend_hours, 24);
    assert_eq!(config.metrics.bind.port(), 8080);
    Ok(())
}

#[test]
fn test_partial_config() -> Result<(), Box<dyn std::error::Error>> {
    let config = BotConfig::from_toml(
        r#"
bot_name = "leveler"

[voice]
reward_interval_secs = 120
experience = { min = 5, max = 10 }

[webhooks]
guild = "https://example.com/hook"
"#,
    )?;
    assert_eq!(config.bot_name, "leveler");
    assert_eq!(config.voice.reward_interval_secs, 120);
    assert_eq!(config.voice.experience, ExperienceRange::new(5, 10));
    assert_eq!(config.voice.minutes_per_tick, 1);
    assert_eq!(config.leveling.message_cooldown_secs, 60);
    assert_eq!(config.webhooks.get("guild").map(String::as_str), Some("https://example.com/hook"));
    Ok(())
}

#[test]
fn test_invalid_values_are_rejected() {
    assert!(BotConfig::from_toml("[leveling]\nmessage_experience = { min = 30, max = 15 }").is_err());
    assert!(BotConfig::from_toml("[voice]\nreward_interval_secs = 0").is_err());
    assert!(BotConfig::from_toml("bot_name = [").is_err());
}

#[test]
fn test_windows_longer_than_a_year_are_rejected() {
    let huge = format!("[leveling]\nmessage_cooldown_secs = {}", i64::MAX);
    assert!(BotConfig::from_toml(&huge).is_err());
    let huge = format!("[status_roles]\nembed_resend_hours = {}", u64::MAX / 2);
    assert!(BotConfig::from_toml(&huge).is_err());
    let huge = format!("[voice]\nreward_interval_secs = {}", MAX_WINDOW_SECS + 1);
    let err = BotConfig::from_toml(&huge).err();
    assert!(err.is_some_and(|e| e.to_string().contains("voice.reward_interval_secs")));

    let mut config = BotConfig::default();
    config.leveling.message_cooldown_secs = MAX_WINDOW_SECS;
    config.status_roles.embed_resend_hours = MAX_WINDOW_SECS / 3600;
    assert!(config.validate().is_ok());
}

#[test]
fn test_cache_config_saturates_unvalidated_hours() {
    let mut config = BotConfig::default();
    config.status_roles.embed_resend_hours = u64::MAX;
    assert_eq!(*config.cache_config().embed_resend_secs(), u64::MAX);
}

#[test]
fn test_cache_config_follows_windows() {
    let mut config = BotConfig::default();
    config.leveling.message_cooldown_secs = 30;
    config.status_roles.embed_resend_hours = 2;
    let caches = config.cache_config();
    assert_eq!(*caches.message_cooldown_secs(), 30);
    assert_eq!(*caches.embed_resend_secs(), 7200);
}

#[test]
fn test_missing_file_is_a_config_error() {
    let err = BotConfig::from_file("/definitely/not/here.toml").err();
    assert!(err.is_some_and(|e| e.to_string().contains("Failed to read config file")));
}
