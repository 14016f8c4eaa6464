//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay
//! chain. All three services read the same file and pick their own section.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the deploy relay chain.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Public-facing gateway settings.
    pub gateway: GatewayConfig,

    /// Middle-hop worker settings.
    pub worker: WorkerConfig,

    /// Compile-and-deploy service settings.
    pub deployer: DeployerConfig,

    /// Solidity compiler invocation settings.
    pub compiler: CompilerConfig,

    /// Chain RPC and confirmation settings.
    pub blockchain: ChainConfig,

    /// Server-level timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Shared secret callers must present in `x-api-key`.
    pub api_key: String,

    /// Base URL of the worker service.
    pub worker_url: String,

    /// Deadline for the gateway→worker leg in seconds.
    pub forward_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            // WARNING: This is a placeholder! Change this in production.
            api_key: "CHANGE_ME_IN_PRODUCTION".to_string(),
            worker_url: "http://127.0.0.1:8000".to_string(),
            forward_timeout_secs: 60,
        }
    }
}

/// Worker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Bind address.
    pub bind_address: String,

    /// Base URL of the deployer service.
    pub deployer_url: String,

    /// Secret the worker injects into `x-api-key` on the downstream leg.
    /// The caller's key never passes through this hop.
    pub deployer_api_key: String,

    /// Deadline for the worker→deployer leg in seconds.
    /// This leg wraps compilation and on-chain confirmation, so it is
    /// larger than the gateway's.
    pub forward_timeout_secs: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            deployer_url: "http://127.0.0.1:8080".to_string(),
            deployer_api_key: "CHANGE_ME_IN_PRODUCTION".to_string(),
            forward_timeout_secs: 90,
        }
    }
}

/// Deployer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DeployerConfig {
    /// Bind address.
    pub bind_address: String,

    /// Shared secret the worker must present in `x-api-key`.
    pub api_key: String,
}

impl Default for DeployerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            api_key: "CHANGE_ME_IN_PRODUCTION".to_string(),
        }
    }
}

/// Solidity compiler invocation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Path to the `solc` binary.
    pub solc_path: String,

    /// Deadline for one compiler run in seconds.
    pub timeout_secs: u64,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            solc_path: "solc".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Chain RPC and confirmation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Chain ID (e.g., 1 for Ethereum mainnet, 31337 for local Anvil).
    pub chain_id: u64,

    /// Per-call RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Number of block confirmations required for finality.
    pub confirmation_blocks: u32,

    /// Overall deadline for the confirmation wait in seconds.
    pub confirmation_timeout_secs: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: 31337,
            rpc_timeout_secs: 10,
            confirmation_blocks: 1,
            confirmation_timeout_secs: 120,
        }
    }
}

/// Server-level timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    /// Must exceed the longest forward leg or inflight deploys get cut off.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 180 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
