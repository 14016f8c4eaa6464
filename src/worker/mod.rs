//! Middle-hop worker.
//!
//! Accepts deploy requests from the gateway, injects its own API key, and
//! relays the deployer's envelope back unchanged so the deployed address
//! survives the chain.

use std::time::{Duration, Instant};

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::config::schema::WorkerConfig;
use crate::http::forward::ForwardClient;
use crate::http::request::DeployRequest;
use crate::http::response::{relay_response, ApiError};
use crate::observability::metrics;

/// Shared state for worker handlers.
#[derive(Clone)]
pub struct WorkerState {
    config: WorkerConfig,
    client: ForwardClient,
}

impl WorkerState {
    pub fn new(config: WorkerConfig) -> Self {
        Self {
            config,
            client: ForwardClient::new(),
        }
    }
}

/// Build the worker router.
pub fn router(state: WorkerState) -> Router {
    Router::new()
        .route("/send-deploy", post(send_deploy))
        .route("/", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "Worker is up and running!"
}

async fn send_deploy(
    State(state): State<WorkerState>,
    payload: Result<Json<DeployRequest>, JsonRejection>,
) -> Response {
    let start = Instant::now();
    let response = match handle_send_deploy(&state, payload).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    };
    metrics::record_request("worker", response.status().as_u16(), start);
    response
}

async fn handle_send_deploy(
    state: &WorkerState,
    payload: Result<Json<DeployRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    tracing::info!("Received deploy request from gateway");

    let Json(request) = payload.map_err(|e| ApiError::InvalidBody(e.to_string()))?;

    // 1. Required parameter.
    if request.contract_code().is_none() {
        tracing::warn!("Missing contractCode parameter");
        return Err(ApiError::MissingContractCode);
    }

    // 2. Forward to the deployer with this hop's own key. The caller's
    //    credentials never pass through.
    let url = format!("{}/deploy", state.config.deployer_url.trim_end_matches('/'));
    tracing::info!(url = %url, "Forwarding deploy request to deployer");

    let forwarded = state
        .client
        .post_deploy(
            &url,
            &request,
            Some(&state.config.deployer_api_key),
            Duration::from_secs(state.config.forward_timeout_secs),
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Forwarding to deployer failed");
            ApiError::Upstream(format!("Failed to send deploy request: {}", e))
        })?;

    tracing::info!(
        status = forwarded.status,
        success = forwarded.envelope.success,
        "Relaying deployer response"
    );

    Ok(relay_response(forwarded.status, forwarded.envelope, "deployer"))
}
