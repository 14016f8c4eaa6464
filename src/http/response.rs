//! Response handling and transformation.
//!
//! # Responsibilities
//! - Define the envelope shape used for every inter-hop and client response
//! - Map service errors to HTTP status codes
//!
//! # Design Decisions
//! - One envelope type end-to-end; hops add context to `error`, never
//!   discard fields
//! - Internal errors surface as envelope messages, never as stack traces

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The `{success, ...}` JSON shape every hop speaks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Envelope {
    pub success: bool,

    /// Deployed contract address, present only on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,

    /// Failure description, present only on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Compiler diagnostics, relayed verbatim when compilation fails.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<serde_json::Value>>,
}

impl Envelope {
    /// Success envelope carrying the deployed address.
    pub fn deployed(contract_address: impl Into<String>) -> Self {
        Self {
            success: true,
            contract_address: Some(contract_address.into()),
            error: None,
            errors: None,
        }
    }

    /// Failure envelope with a message.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            contract_address: None,
            error: Some(error.into()),
            errors: None,
        }
    }

    /// Failure envelope carrying compiler diagnostics.
    pub fn failure_with_diagnostics(
        error: impl Into<String>,
        diagnostics: Vec<serde_json::Value>,
    ) -> Self {
        Self {
            success: false,
            contract_address: None,
            error: Some(error.into()),
            errors: Some(diagnostics),
        }
    }

    /// Prefix the failure message with the hop it came through.
    ///
    /// Success envelopes pass through untouched so the address is never
    /// rewritten mid-chain.
    pub fn with_context(mut self, hop: &str) -> Self {
        if !self.success {
            self.error = Some(match self.error.take() {
                Some(detail) => format!("{}: {}", hop, detail),
                None => format!("{}: downstream hop failed without detail", hop),
            });
        }
        self
    }
}

/// Errors a hop can answer a deploy request with.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body was not a JSON deploy request at all.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// Required source text absent or empty.
    #[error("Missing contractCode parameter")]
    MissingContractCode,

    /// Presented `x-api-key` does not match the configured secret.
    #[error("Forbidden: Invalid API Key")]
    InvalidApiKey,

    /// The compiler reported error-severity diagnostics.
    #[error("Compilation failed")]
    Compilation(Vec<serde_json::Value>),

    /// Input was structurally valid but cannot be acted on
    /// (no contract, ambiguous selection, unknown name).
    #[error("{0}")]
    UnprocessableSource(String),

    /// The downstream hop could not be reached or timed out.
    #[error("{0}")]
    Upstream(String),

    /// Compilation infrastructure or on-chain deployment failed.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingContractCode => StatusCode::BAD_REQUEST,
            ApiError::InvalidApiKey => StatusCode::FORBIDDEN,
            ApiError::Compilation(_) => StatusCode::BAD_REQUEST,
            ApiError::UnprocessableSource(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let envelope = match self {
            ApiError::Compilation(diagnostics) => {
                Envelope::failure_with_diagnostics("Compilation failed", diagnostics)
            }
            other => Envelope::failure(other.to_string()),
        };
        (status, Json(envelope)).into_response()
    }
}

/// Relay a downstream envelope with its status code, adding hop context on
/// failure paths.
pub fn relay_response(status: u16, envelope: Envelope, hop: &str) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(envelope.with_context(hop))).into_response()
}
