//! Prometheus metrics for bot operations.

use kbbq_error::{ConfigError, KbbqResult};
use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};
use std::collections::HashMap;
use std::sync::Arc;

/// Every metric the bot submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Metric {
    /// Commands run, by outcome
    CommandsUsed,
    /// Interactions received
    InteractionsCreated,
    /// Guilds served
    GuildCount,
    /// Gateway heartbeat latency
    Latency,
    /// Gateway events received
    WebsocketEvents,
    /// Voice minutes rewarded
    MinutesInVoice,
    /// Members eligible for voice rewards
    UsersInVoice,
    /// Members rewarded by the last voice tick
    UsersRewarded,
    /// Ranked members per guild
    UserLevels,
    /// Active members per guild and week
    UserActivity,
    /// Level changes announced
    LevelUps,
    /// Status-role edits applied
    StatusRoleUpdates,
}

impl Metric {
    /// Label names, in registration order.
    pub fn labels(self) -> &'static [&'static str] {
        match self {
            Self::CommandsUsed => &["command", "type", "success", "shard"],
            Self::InteractionsCreated => &["name", "type", "shard"],
            Self::GuildCount | Self::Latency => &["shard"],
            Self::WebsocketEvents => &["type", "shard"],
            Self::MinutesInVoice
            | Self::UsersInVoice
            | Self::UsersRewarded
            | Self::LevelUps
            | Self::StatusRoleUpdates => &["guildId"],
            Self::UserLevels => &["guildId", "shard"],
            Self::UserActivity => &["guildId", "shard", "currentWeek", "type"],
        }
    }

    fn help(self) -> &'static str {
        match self {
            Self::CommandsUsed => "Application commands run",
            Self::InteractionsCreated => "Interactions received",
            Self::GuildCount => "Guilds served by the shard",
            Self::Latency => "Gateway heartbeat latency in milliseconds",
            Self::WebsocketEvents => "Gateway events received",
            Self::MinutesInVoice => "Voice minutes rewarded",
            Self::UsersInVoice => "Members eligible for voice rewards",
            Self::UsersRewarded => "Members rewarded by the last voice tick",
            Self::UserLevels => "Members on the level leaderboard",
            Self::UserActivity => "Members active this week",
            Self::LevelUps => "Level changes announced",
            Self::StatusRoleUpdates => "Status-role edits applied",
        }
    }
}

/// How a value is applied to a gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricOp {
    /// Add to the current value
    Inc,
    /// Replace the current value
    Set,
}

/// Metrics registry passed explicitly to every component that reports.
///
/// Clones share the registry.
#[derive(Clone)]
pub struct BotMetrics {
    registry: Arc<Registry>,
    gauges: Arc<HashMap<Metric, GaugeVec>>,
}

impl std::fmt::Debug for BotMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotMetrics")
            .field("metrics", &self.gauges.len())
            .finish()
    }
}

/// Order `labels` the way `metric` declares them; missing ones are empty.
fn label_values<'a>(metric: Metric, labels: &[(&str, &'a str)]) -> Vec<&'a str> {
    metric
        .labels()
        .iter()
        .map(|name| {
            labels
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| *value)
                .unwrap_or("")
        })
        .collect()
}

impl BotMetrics {
    /// Create a registry holding every [`Metric`].
    pub fn new() -> KbbqResult<Self> {
        use strum::IntoEnumIterator;

        let registry = Registry::new();
        let mut gauges = HashMap::new();
        for metric in Metric::iter() {
            let gauge = GaugeVec::new(Opts::new(metric.as_ref(), metric.help()), metric.labels())
                .map_err(|e| ConfigError::new(format!("Invalid metric {metric}: {e}")))?;
            registry
                .register(Box::new(gauge.clone()))
                .map_err(|e| ConfigError::new(format!("Failed to register {metric}: {e}")))?;
            gauges.insert(metric, gauge);
        }
        Ok(Self {
            registry: Arc::new(registry),
            gauges: Arc::new(gauges),
        })
    }

    /// Apply `value` to a metric; labels not supplied are rendered empty.
    pub fn submit(&self, metric: Metric, op: MetricOp, value: f64, labels: &[(&str, &str)]) {
        let Some(gauge) = self.gauges.get(&metric) else {
            return;
        };
        let gauge = gauge.with_label_values(&label_values(metric, labels));
        match op {
            MetricOp::Inc => gauge.add(value),
            MetricOp::Set => gauge.set(value),
        }
    }

    /// Increment by one.
    pub fn inc(&self, metric: Metric, labels: &[(&str, &str)]) {
        self.submit(metric, MetricOp::Inc, 1.0, labels);
    }

    /// Current value of a metric for a label set.
    pub fn value(&self, metric: Metric, labels: &[(&str, &str)]) -> f64 {
        let Some(gauge) = self.gauges.get(&metric) else {
            return 0.0;
        };
        gauge.with_label_values(&label_values(metric, labels)).get()
    }

    /// Render the registry in the Prometheus text format.
    pub fn render(&self) -> KbbqResult<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(|e| ConfigError::new(format!("Failed to encode metrics: {e}")))?;
        String::from_utf8(buffer)
            .map_err(|e| ConfigError::new(format!("Metrics are not UTF-8: {e}")).into())
    }
}
