//! HTTP proxy endpoint serving rates rebased to the pivot currency.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::core::config::ServerConfig;
use crate::core::currency::PIVOT_CURRENCY;
use crate::core::rates::{RatesPayload, rebase_to_pivot};
use crate::core::source::{ProviderError, RateSource};

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn RateSource>,
}

/// Caller-facing error taxonomy. Full detail stays in the server logs; the
/// response body only ever carries one of these generic messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ApiError {
    MissingApiKey,
    UpstreamFailed,
    InvalidResponse,
    Internal,
}

impl ApiError {
    fn message(&self) -> &'static str {
        match self {
            ApiError::MissingApiKey => "Missing EXCHANGE_API_KEY",
            ApiError::UpstreamFailed => "Failed to fetch rates from provider",
            ApiError::InvalidResponse => "Provider response invalid (no GBP rate)",
            ApiError::Internal => "Internal server error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.message() })),
        )
            .into_response()
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        match &err {
            ProviderError::MissingApiKey => {
                error!("{} is not configured", crate::core::config::API_KEY_ENV);
                ApiError::MissingApiKey
            }
            ProviderError::Status { status, body } => {
                error!(status = *status, body = %body, "External API error");
                ApiError::UpstreamFailed
            }
            ProviderError::MissingRates => {
                error!("Provider response has no rates object");
                ApiError::InvalidResponse
            }
            ProviderError::Transport(_) | ProviderError::Malformed(_) => {
                error!(error = %err, "Internal error in /api/rates");
                ApiError::Internal
            }
        }
    }
}

async fn rates_handler(State(state): State<AppState>) -> Result<Json<RatesPayload>, ApiError> {
    let upstream = state.source.latest_rates().await?;

    let rebased = rebase_to_pivot(&upstream).ok_or_else(|| {
        error!(?upstream, "Provider response missing GBP rate");
        ApiError::InvalidResponse
    })?;

    Ok(Json(RatesPayload {
        base: PIVOT_CURRENCY.to_string(),
        rates: rebased,
    }))
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/api/rates", get(rates_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run_server(config: &ServerConfig, state: AppState) -> Result<()> {
    let app = create_app(state);

    let bind_address = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&bind_address).await?;
    info!("Proxy listening on {bind_address}");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Information about a running proxy server
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub host: String,
    pub port: u16,
}

impl ServerInfo {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Start a server on a random available port for library and test usage.
pub async fn start_server_with_random_port(state: AppState) -> Result<ServerInfo> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let app = create_app(state);
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Server error: {e}");
        }
    });

    info!("Started proxy on 127.0.0.1:{} (random port)", addr.port());
    Ok(ServerInfo {
        host: "127.0.0.1".to_string(),
        port: addr.port(),
    })
}
