//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check bind addresses and downstream URLs actually parse
//! - Validate value ranges (timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::RelayConfig;

/// A single semantic configuration error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g., "gateway.worker_url").
    pub field: String,
    /// Human-readable description.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn check_bind(errors: &mut Vec<ValidationError>, field: &str, addr: &str) {
    if addr.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: field.to_string(),
            message: format!("'{}' is not a valid socket address", addr),
        });
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &str, url: &str) {
    match url::Url::parse(url) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => {}
        Ok(parsed) => errors.push(ValidationError {
            field: field.to_string(),
            message: format!("unsupported URL scheme '{}'", parsed.scheme()),
        }),
        Err(e) => errors.push(ValidationError {
            field: field.to_string(),
            message: format!("'{}' is not a valid URL: {}", url, e),
        }),
    }
}

fn check_nonzero(errors: &mut Vec<ValidationError>, field: &str, value: u64) {
    if value == 0 {
        errors.push(ValidationError {
            field: field.to_string(),
            message: "must be greater than zero".to_string(),
        });
    }
}

fn check_secret(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if value.is_empty() {
        errors.push(ValidationError {
            field: field.to_string(),
            message: "must not be empty".to_string(),
        });
    }
}

/// Validate semantic constraints across the whole config.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_bind(&mut errors, "gateway.bind_address", &config.gateway.bind_address);
    check_bind(&mut errors, "worker.bind_address", &config.worker.bind_address);
    check_bind(&mut errors, "deployer.bind_address", &config.deployer.bind_address);

    check_url(&mut errors, "gateway.worker_url", &config.gateway.worker_url);
    check_url(&mut errors, "worker.deployer_url", &config.worker.deployer_url);
    check_url(&mut errors, "blockchain.rpc_url", &config.blockchain.rpc_url);

    check_secret(&mut errors, "gateway.api_key", &config.gateway.api_key);
    check_secret(&mut errors, "worker.deployer_api_key", &config.worker.deployer_api_key);
    check_secret(&mut errors, "deployer.api_key", &config.deployer.api_key);

    check_nonzero(
        &mut errors,
        "gateway.forward_timeout_secs",
        config.gateway.forward_timeout_secs,
    );
    check_nonzero(
        &mut errors,
        "worker.forward_timeout_secs",
        config.worker.forward_timeout_secs,
    );
    check_nonzero(&mut errors, "compiler.timeout_secs", config.compiler.timeout_secs);
    check_nonzero(&mut errors, "blockchain.rpc_timeout_secs", config.blockchain.rpc_timeout_secs);
    check_nonzero(
        &mut errors,
        "blockchain.confirmation_timeout_secs",
        config.blockchain.confirmation_timeout_secs,
    );
    check_nonzero(&mut errors, "timeouts.request_secs", config.timeouts.request_secs);

    if config.observability.metrics_enabled {
        check_bind(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
