//! HTTP exporter for bot metrics.

use crate::BotMetrics;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

/// API state containing the metrics registry and the optional bearer token.
#[derive(Clone)]
pub struct ApiState {
    metrics: BotMetrics,
    auth_token: Option<Arc<str>>,
}

impl ApiState {
    /// Creates new API state.
    pub fn new(metrics: BotMetrics, auth_token: Option<String>) -> Self {
        Self {
            metrics,
            auth_token: auth_token.map(Into::into),
        }
    }
}

/// Creates the metrics API router.
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/metrics", get(get_metrics))
        .with_state(state)
}

/// Serve the router until the process exits.
pub async fn serve(bind: SocketAddr, state: ApiState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(%bind, "Metrics server listening");
    axum::serve(listener, create_router(state)).await
}

async fn ping() -> &'static str {
    "PONG!"
}

async fn get_metrics(State(state): State<ApiState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = &state.auth_token {
        let expected = format!("Bearer {token}");
        let authorized = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value == expected);
        if !authorized {
            return (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()).into_response();
        }
    }

    match state.metrics.render() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render metrics".to_string())
                .into_response()
        }
    }
}
