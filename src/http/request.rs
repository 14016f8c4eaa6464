//! Request handling and transformation.
//!
//! # Responsibilities
//! - Define the deploy request wire shape shared by every hop
//! - Generate unique request IDs (UUID v4)
//!
//! # Design Decisions
//! - `contractCode` is deserialized as optional so its absence can be
//!   answered with the envelope shape instead of a deserializer rejection
//! - Request ID added as early as possible and propagated downstream

use axum::http::{HeaderValue, Request};
use serde::{Deserialize, Serialize};
use tower_http::request_id::{MakeRequestId, RequestId};

/// Header carrying the per-hop shared secret.
pub const X_API_KEY: &str = "x-api-key";

/// Body of a deploy request, identical on every hop.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeployRequest {
    /// Solidity source text. Required; validated per hop.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_code: Option<String>,

    /// Which contract in the source to deploy. Required only when the
    /// source defines more than one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_name: Option<String>,
}

impl DeployRequest {
    /// Build a request for the given source.
    pub fn new(contract_code: impl Into<String>) -> Self {
        Self {
            contract_code: Some(contract_code.into()),
            contract_name: None,
        }
    }

    /// The source text, if present and non-empty.
    pub fn contract_code(&self) -> Option<&str> {
        self.contract_code
            .as_deref()
            .filter(|code| !code.trim().is_empty())
    }
}

/// Generates a fresh UUID v4 for each request lacking an `x-request-id`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}
