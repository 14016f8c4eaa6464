//! Compile-and-deploy service, the end of the chain.
//!
//! Authenticates the worker's request, compiles the source, selects the
//! contract to deploy, submits the creation transaction, and answers with
//! the confirmed address.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::blockchain::ContractDeployer;
use crate::config::schema::DeployerConfig;
use crate::http::request::{DeployRequest, X_API_KEY};
use crate::http::response::{ApiError, Envelope};
use crate::observability::metrics;
use crate::solc::{CompileError, Compiler};

/// Shared state for deployer handlers.
#[derive(Clone)]
pub struct DeployerState {
    config: DeployerConfig,
    compiler: Arc<Compiler>,
    chain: Arc<ContractDeployer>,
}

impl DeployerState {
    pub fn new(config: DeployerConfig, compiler: Compiler, chain: ContractDeployer) -> Self {
        Self {
            config,
            compiler: Arc::new(compiler),
            chain: Arc::new(chain),
        }
    }
}

/// Build the deployer router.
pub fn router(state: DeployerState) -> Router {
    Router::new()
        .route("/deploy", post(deploy))
        .route("/", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "Deployer is up and running!"
}

async fn deploy(
    State(state): State<DeployerState>,
    headers: HeaderMap,
    payload: Result<Json<DeployRequest>, JsonRejection>,
) -> Response {
    let start = Instant::now();
    let response = match handle_deploy(&state, &headers, payload).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    };
    metrics::record_request("deployer", response.status().as_u16(), start);
    response
}

async fn handle_deploy(
    state: &DeployerState,
    headers: &HeaderMap,
    payload: Result<Json<DeployRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    tracing::info!("Received deploy request");

    let Json(request) = payload.map_err(|e| ApiError::InvalidBody(e.to_string()))?;

    // 1. Required parameter, checked before the key.
    let Some(source) = request.contract_code() else {
        tracing::warn!("Missing contractCode parameter");
        return Err(ApiError::MissingContractCode);
    };

    // 2. Worker's API key.
    let presented = headers.get(X_API_KEY).and_then(|v| v.to_str().ok());
    if presented != Some(state.config.api_key.as_str()) {
        tracing::warn!("Forbidden: Invalid API Key");
        return Err(ApiError::InvalidApiKey);
    }

    // 3. Compile.
    tracing::info!(source_bytes = source.len(), "Compiling contract");
    let output = state
        .compiler
        .compile(source)
        .await
        .map_err(map_compile_error)?;

    // 4. Select the contract to deploy.
    let artifact = output
        .select_artifact(request.contract_name.as_deref())
        .map_err(map_compile_error)?;

    // 5. Deploy and wait for confirmation.
    tracing::info!(contract = %artifact.name, "Deploying contract");
    let receipt = state.chain.deploy(&artifact).await.map_err(|e| {
        tracing::error!(error = %e, "Deployment failed");
        ApiError::Internal(e.to_string())
    })?;

    tracing::info!(
        contract = %artifact.name,
        contract_address = %receipt.contract_address,
        block_number = receipt.block_number,
        "Contract deployed"
    );

    Ok((
        StatusCode::OK,
        Json(Envelope::deployed(receipt.contract_address.to_string())),
    )
        .into_response())
}

fn map_compile_error(e: CompileError) -> ApiError {
    match e {
        CompileError::Rejected(diagnostics) => {
            ApiError::Compilation(diagnostics.iter().map(|d| d.to_value()).collect())
        }
        e @ (CompileError::NoContract
        | CompileError::Ambiguous(_)
        | CompileError::UnknownContract(_)
        | CompileError::NoBytecode(_)
        | CompileError::BadBytecode(..)) => ApiError::UnprocessableSource(e.to_string()),
        e @ (CompileError::Spawn { .. }
        | CompileError::Timeout(_)
        | CompileError::Abnormal { .. }
        | CompileError::Json(_)) => {
            tracing::error!(error = %e, "Compiler infrastructure failure");
            ApiError::Internal(format!("compiler failure: {}", e))
        }
    }
}
