//! Bot configuration and credentials.

use kbbq_cache::{CacheConfig, CacheConfigBuilder};
use kbbq_core::ExperienceRange;
use kbbq_error::{ConfigError, KbbqError, KbbqResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Longest cooldown, reward interval or resend window accepted: one year.
pub const MAX_WINDOW_SECS: u64 = 365 * 24 * SECS_PER_HOUR;

const SECS_PER_HOUR: u64 = 3600;

/// Configuration for the bot process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Name used for webhook log lines
    pub bot_name: String,
    /// Message leveling configuration
    pub leveling: LevelingConfig,
    /// Voice reward configuration
    pub voice: VoiceConfig,
    /// Status-role configuration
    pub status_roles: StatusRoleConfig,
    /// Metrics exporter configuration
    pub metrics: MetricsConfig,
    /// Database pool configuration
    pub database: DatabaseConfig,
    /// Webhook URL per log channel (`console`, `guild`, `error`)
    pub webhooks: HashMap<String, String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            bot_name: "kbbq".to_string(),
            leveling: LevelingConfig::default(),
            voice: VoiceConfig::default(),
            status_roles: StatusRoleConfig::default(),
            metrics: MetricsConfig::default(),
            database: DatabaseConfig::default(),
            webhooks: HashMap::new(),
        }
    }
}

impl BotConfig {
    /// Load bot configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> KbbqResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            KbbqError::from(ConfigError::new(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            )))
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration text.
    pub fn from_toml(content: &str) -> KbbqResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| {
            KbbqError::from(ConfigError::new(format!("Failed to parse config: {}", e)))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject ranges and intervals the engines cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.leveling.message_experience.validate()?;
        self.voice.experience.validate()?;
        check_window(
            "leveling.message_cooldown_secs",
            self.leveling.message_cooldown_secs,
            MAX_WINDOW_SECS,
        )?;
        check_window(
            "voice.reward_interval_secs",
            self.voice.reward_interval_secs,
            MAX_WINDOW_SECS,
        )?;
        check_window(
            "status_roles.embed_resend_hours",
            self.status_roles.embed_resend_hours,
            MAX_WINDOW_SECS / SECS_PER_HOUR,
        )?;
        if self.database.pool_size == 0 {
            return Err(ConfigError::new("database.pool_size must be positive"));
        }
        Ok(())
    }

    /// Let `PROMETHEUS_AUTH` replace the configured exporter token.
    pub fn with_env_overrides(mut self) -> Self {
        match std::env::var("PROMETHEUS_AUTH") {
            Ok(token) if !token.is_empty() => self.metrics.auth_token = Some(token),
            _ => {}
        }
        self
    }

    /// Cache settings derived from this configuration.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfigBuilder::default()
            .message_cooldown_secs(self.leveling.message_cooldown_secs)
            .embed_resend_secs(
                self.status_roles
                    .embed_resend_hours
                    .saturating_mul(SECS_PER_HOUR),
            )
            .build()
            .unwrap_or_default()
    }

    /// Interval between voice reward ticks.
    pub fn reward_interval(&self) -> Duration {
        Duration::from_secs(self.voice.reward_interval_secs)
    }
}

fn check_window(field: &str, value: u64, max: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::new(format!("{} must be positive", field)));
    }
    if value > max {
        return Err(ConfigError::new(format!("{} must be at most {}", field, max)));
    }
    Ok(())
}

/// Experience granted for messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelingConfig {
    /// Seconds between grants for the same user
    pub message_cooldown_secs: u64,
    /// Experience per qualifying message
    pub message_experience: ExperienceRange,
}

impl Default for LevelingConfig {
    fn default() -> Self {
        Self {
            message_cooldown_secs: 60,
            message_experience: ExperienceRange::new(15, 30),
        }
    }
}

/// Experience granted for time in voice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Seconds between reward ticks
    pub reward_interval_secs: u64,
    /// Experience per tick, shared by every participant of a guild
    pub experience: ExperienceRange,
    /// Voice minutes recorded per tick
    pub minutes_per_tick: u64,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            reward_interval_secs: 60,
            experience: ExperienceRange::new(0, 25),
            minutes_per_tick: 1,
        }
    }
}

/// Status-role announcements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusRoleConfig {
    /// Hours before the same announcement is sent to the same user again
    pub embed_resend_hours: u64,
}

impl Default for StatusRoleConfig {
    fn default() -> Self {
        Self {
            embed_resend_hours: 24,
        }
    }
}

/// Metrics exporter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Listen address
    pub bind: SocketAddr,
    /// Bearer token required on `/metrics`
    pub auth_token: Option<String>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8080)),
            auth_token: None,
        }
    }
}

/// Database pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Maximum pooled connections
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { pool_size: 10 }
    }
}

/// Credentials read from the environment.
#[derive(Clone)]
pub struct Secrets {
    /// Gateway bot token
    pub discord_token: String,
    /// PostgreSQL connection URL
    pub database_url: String,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("discord_token", &"<redacted>")
            .field("database_url", &"<redacted>")
            .finish()
    }
}

impl Secrets {
    /// Read `DISCORD_TOKEN` and `DATABASE_URL`, loading `.env` first.
    pub fn from_env() -> KbbqResult<Self> {
        dotenvy::dotenv().ok();
        Ok(Self {
            discord_token: require_env("DISCORD_TOKEN")?,
            database_url: require_env("DATABASE_URL")?,
        })
    }
}

fn require_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::new(format!("{name} not set")))
}
