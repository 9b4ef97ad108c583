//! Log delivery to chat webhooks.

use serde_json::json;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Which webhook a log line goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum WebhookChannel {
    /// Process lifecycle (ready, shutdown)
    Console,
    /// Guild joins
    Guild,
    /// Unhandled errors
    Error,
}

/// Posts log lines to per-channel webhook URLs.
///
/// A channel without a URL is silently skipped.
#[derive(Debug, Clone)]
pub struct WebhookLogger {
    client: reqwest::Client,
    urls: HashMap<String, String>,
    username: String,
}

impl WebhookLogger {
    /// Create a logger posting as `username`.
    pub fn new(urls: HashMap<String, String>, username: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            urls,
            username: username.into(),
        }
    }

    /// A logger with no webhooks.
    pub fn disabled() -> Self {
        Self::new(HashMap::new(), "kbbq")
    }

    /// Whether a URL is configured for `channel`.
    pub fn is_configured(&self, channel: WebhookChannel) -> bool {
        self.urls.contains_key(channel.as_ref())
    }

    /// Post `content`; delivery failures are logged, never returned.
    pub async fn log(&self, channel: WebhookChannel, content: &str) {
        let Some(url) = self.urls.get(channel.as_ref()) else {
            debug!(%channel, "No webhook configured");
            return;
        };
        let body = json!({
            "content": content,
            "username": self.username,
            "allowed_mentions": { "parse": [] },
        });
        match self.client.post(url).json(&body).send().await {
            Ok(response) if response.status().is_success() => {}
            Ok(response) => warn!(%channel, status = %response.status(), "Webhook rejected log"),
            Err(e) => warn!(%channel, error = %e, "Failed to deliver webhook log"),
        }
    }
}
