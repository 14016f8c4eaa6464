//! Downstream hop forwarding.
//!
//! # Responsibilities
//! - POST a deploy request to the next hop with a bounded deadline
//! - Inject a per-hop API key when the leg requires one
//! - Distinguish timeouts from other transport failures
//! - Decode the downstream envelope without interpreting it

use std::time::Duration;

use thiserror::Error;

use crate::http::request::{DeployRequest, X_API_KEY};
use crate::http::response::Envelope;

/// Failure to complete a downstream call.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// Deadline elapsed before the downstream hop answered.
    #[error("request to {url} timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    /// Connection-level failure (refused, reset, DNS).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The downstream hop answered with something other than an envelope.
    #[error("invalid response from {url}: {detail}")]
    InvalidResponse { url: String, detail: String },
}

/// A decoded downstream response.
#[derive(Debug)]
pub struct Forwarded {
    /// Downstream HTTP status, relayed by the caller.
    pub status: u16,
    /// Downstream envelope, relayed by the caller.
    pub envelope: Envelope,
}

/// Shared client for the forward legs of the chain.
#[derive(Clone)]
pub struct ForwardClient {
    client: reqwest::Client,
}

impl ForwardClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// POST the deploy request to `url` and decode the envelope.
    ///
    /// The per-request timeout covers the full leg including the downstream
    /// hop's own work, so callers size it to what the leg wraps.
    pub async fn post_deploy(
        &self,
        url: &str,
        request: &DeployRequest,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Forwarded, ForwardError> {
        let mut builder = self.client.post(url).json(request).timeout(timeout);
        if let Some(key) = api_key {
            builder = builder.header(X_API_KEY, key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ForwardError::Timeout {
                    url: url.to_string(),
                    secs: timeout.as_secs(),
                }
            } else {
                ForwardError::Transport {
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                ForwardError::Timeout {
                    url: url.to_string(),
                    secs: timeout.as_secs(),
                }
            } else {
                ForwardError::Transport {
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;

        let envelope =
            serde_json::from_slice(&body).map_err(|e| ForwardError::InvalidResponse {
                url: url.to_string(),
                detail: format!("status {}, undecodable body: {}", status, e),
            })?;

        Ok(Forwarded { status, envelope })
    }
}

impl Default for ForwardClient {
    fn default() -> Self {
        Self::new()
    }
}
