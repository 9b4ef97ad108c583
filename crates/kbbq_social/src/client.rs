//! Serenity client setup and lifecycle management.

use crate::{KbbqHandler, platform_error};
use kbbq_bot::{BotMetrics, Engines, Metric, MetricOp};
use kbbq_error::KbbqResult;
use serenity::Client;
use serenity::gateway::ShardManager;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, instrument};

/// The gateway connection of the kbbq bot.
pub struct KbbqBot {
    client: Client,
}

impl KbbqBot {
    /// Build the serenity client around `engines`.
    #[instrument(skip(token, engines), fields(token_len = token.len()))]
    pub async fn new(token: &str, engines: Engines) -> KbbqResult<Self> {
        let intents = KbbqHandler::intents();
        info!(?intents, "Building Serenity client");
        let client = Client::builder(token, intents)
            .event_handler(KbbqHandler::new(engines))
            .await
            .map_err(platform_error)?;
        Ok(Self { client })
    }

    /// Report every shard's heartbeat latency to `latency{shard}` each `period`.
    pub fn spawn_latency_reporter(&self, metrics: BotMetrics, period: Duration) -> JoinHandle<()> {
        let manager: Arc<ShardManager> = self.client.shard_manager.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let runners = manager.runners.lock().await;
                for (shard, runner) in runners.iter() {
                    if let Some(latency) = runner.latency {
                        metrics.submit(
                            Metric::Latency,
                            MetricOp::Set,
                            latency.as_millis() as f64,
                            &[("shard", shard.0.to_string().as_str())],
                        );
                    }
                }
            }
        })
    }

    /// Connect with Discord's recommended shard count and run until shutdown.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> KbbqResult<()> {
        info!("Starting Discord bot");
        self.client.start_autosharded().await.map_err(platform_error)?;
        Ok(())
    }
}
