//! Public-facing gateway.
//!
//! Accepts the original deploy request, checks the caller's API key, and
//! relays the worker's envelope back. The caller's key never travels
//! downstream; the worker leg is unauthenticated by design.

use std::time::{Duration, Instant};

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;

use crate::config::schema::GatewayConfig;
use crate::http::forward::ForwardClient;
use crate::http::request::{DeployRequest, X_API_KEY};
use crate::http::response::{relay_response, ApiError};
use crate::observability::metrics;

/// Shared state for gateway handlers.
#[derive(Clone)]
pub struct GatewayState {
    config: GatewayConfig,
    client: ForwardClient,
}

impl GatewayState {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            client: ForwardClient::new(),
        }
    }
}

/// Build the gateway router. Browser callers are expected, so CORS is open.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/deploy", post(deploy))
        .route("/health", get(health))
        .route("/", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "Gateway is up and running!"
}

async fn deploy(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    payload: Result<Json<DeployRequest>, JsonRejection>,
) -> Response {
    let start = Instant::now();
    let response = match handle_deploy(&state, &headers, payload).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    };
    metrics::record_request("gateway", response.status().as_u16(), start);
    response
}

async fn handle_deploy(
    state: &GatewayState,
    headers: &HeaderMap,
    payload: Result<Json<DeployRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    tracing::info!("Received deploy request");

    let Json(request) = payload.map_err(|e| ApiError::InvalidBody(e.to_string()))?;

    // 1. Required parameter, checked before the key.
    if request.contract_code().is_none() {
        tracing::warn!("Missing contractCode parameter");
        return Err(ApiError::MissingContractCode);
    }

    // 2. Caller's API key.
    let presented = headers.get(X_API_KEY).and_then(|v| v.to_str().ok());
    if presented != Some(state.config.api_key.as_str()) {
        tracing::warn!("Forbidden: Invalid API Key");
        return Err(ApiError::InvalidApiKey);
    }

    // 3. Forward to the worker and relay whatever comes back.
    let url = format!(
        "{}/send-deploy",
        state.config.worker_url.trim_end_matches('/')
    );
    tracing::info!(url = %url, "Forwarding deploy request to worker");

    let forwarded = state
        .client
        .post_deploy(
            &url,
            &request,
            None,
            Duration::from_secs(state.config.forward_timeout_secs),
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Forwarding to worker failed");
            ApiError::Upstream(e.to_string())
        })?;

    if forwarded.envelope.success {
        tracing::info!(
            contract_address = forwarded.envelope.contract_address.as_deref().unwrap_or("<none>"),
            "Contract deployed"
        );
    } else {
        tracing::error!(
            status = forwarded.status,
            error = forwarded.envelope.error.as_deref().unwrap_or("<none>"),
            "Worker relayed a failure"
        );
    }

    Ok(relay_response(forwarded.status, forwarded.envelope, "worker"))
}
