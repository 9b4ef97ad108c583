//! `kbbq run`: wires the engines to PostgreSQL, Discord and the metrics server.

use kbbq_bot::{ApiState, BotConfig, BotContext, BotMetrics, Engines, Secrets, WebhookLogger, serve};
use kbbq_database::{PostgresRepository, establish_connection, establish_pool, run_migrations};
use kbbq_error::KbbqResult;
use kbbq_social::{KbbqBot, SerenityGuildApi};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument};

const DEFAULT_CONFIG_PATH: &str = "kbbq.toml";
const LATENCY_REPORT_PERIOD: Duration = Duration::from_secs(30);

/// Load `path`, else `kbbq.toml` when present, else the defaults.
pub fn load_config(path: Option<&Path>) -> KbbqResult<BotConfig> {
    let config = match path {
        Some(path) => BotConfig::from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => BotConfig::from_file(DEFAULT_CONFIG_PATH)?,
        None => BotConfig::default(),
    };
    Ok(config.with_env_overrides())
}

/// Run the bot until the gateway connection ends.
#[instrument(skip_all)]
pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let secrets = Secrets::from_env()?;
    let config = load_config(config_path)?;
    info!(bot_name = %config.bot_name, "Configuration loaded");

    let mut conn = establish_connection()?;
    run_migrations(&mut conn)?;
    drop(conn);
    let pool = establish_pool(&secrets.database_url, config.database.pool_size)?;

    let metrics = BotMetrics::new()?;
    let webhooks = WebhookLogger::new(config.webhooks.clone(), config.bot_name.clone());
    let api_state = ApiState::new(metrics.clone(), config.metrics.auth_token.clone());
    let bind = config.metrics.bind;

    let context = BotContext::new(
        Arc::new(PostgresRepository::new(pool)),
        Arc::new(SerenityGuildApi::new(&secrets.discord_token)),
        metrics.clone(),
        config,
        webhooks,
    );
    let engines = Engines::new(context);

    tokio::spawn(async move {
        if let Err(e) = serve(bind, api_state).await {
            error!(error = %e, %bind, "Metrics server stopped");
        }
    });
    tokio::spawn(engines.rewards().clone().run());

    let mut bot = KbbqBot::new(&secrets.discord_token, engines).await?;
    bot.spawn_latency_reporter(metrics, LATENCY_REPORT_PERIOD);
    bot.start().await?;
    Ok(())
}
