//! Test utilities for engine tests.
//!
//! Engines run over the in-memory repository and a recording platform API.

#![allow(dead_code)]

pub mod mock_guild_api;

pub use mock_guild_api::{member, MockGuildApi, RoleEdit, SentMessage};

use kbbq_bot::{BotConfig, BotContext, BotMetrics, Engines, WebhookLogger};
use kbbq_core::ExperienceRange;
use kbbq_interface::InMemoryRepository;
use std::sync::Arc;

/// Engines plus handles to their fakes.
pub struct Harness {
    pub engines: Engines,
    pub repository: InMemoryRepository,
    pub api: Arc<MockGuildApi>,
    pub metrics: BotMetrics,
}

impl Harness {
    pub fn context(&self) -> &BotContext {
        self.engines.context()
    }
}

/// Default configuration with fixed experience awards.
pub fn fixed_config(message_experience: u64, voice_experience: u64) -> BotConfig {
    let mut config = BotConfig::default();
    config.leveling.message_experience = ExperienceRange::fixed(message_experience);
    config.voice.experience = ExperienceRange::fixed(voice_experience);
    config
}

pub fn harness(config: BotConfig) -> Harness {
    let repository = InMemoryRepository::new();
    let api = Arc::new(MockGuildApi::new());
    let metrics = BotMetrics::new().expect("metrics registry");
    let context = BotContext::new(
        Arc::new(repository.clone()),
        api.clone(),
        metrics.clone(),
        config,
        WebhookLogger::disabled(),
    );
    Harness {
        engines: Engines::new(context),
        repository,
        api,
        metrics,
    }
}
