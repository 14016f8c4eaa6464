//! Solidity deploy relay (launcher).
//!
//! One binary runs any of the three services in the chain:
//!
//! ```text
//!                  ┌──────────────────────────────────────────────────┐
//!                  │                  DEPLOY RELAY                    │
//!                  │                                                  │
//!   POST /deploy   │  ┌─────────┐      ┌────────┐      ┌──────────┐  │
//!   ───────────────┼─▶│ gateway │─────▶│ worker │─────▶│ deployer │──┼──▶ solc
//!   x-api-key      │  └─────────┘      └────────┘      └────┬─────┘  │
//!                  │       ▲            injects own          │        │
//!                  │       │            x-api-key            ▼        │
//!   contractAddress│       │                            ┌──────────┐  │
//!   ◀──────────────┼───────┴────────────────────────────│ EVM node │  │
//!                  │         envelope relayed back      └──────────┘  │
//!                  └──────────────────────────────────────────────────┘
//! ```
//!
//! All three read the same TOML config file and pick their own section.
//! The deployer additionally needs `RELAY_DEPLOYER_PRIVATE_KEY` in the
//! environment.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use contract_relay::blockchain::{ContractDeployer, Wallet};
use contract_relay::config::{load_config, RelayConfig};
use contract_relay::deployer::DeployerState;
use contract_relay::gateway::GatewayState;
use contract_relay::http::HttpServer;
use contract_relay::observability;
use contract_relay::solc::Compiler;
use contract_relay::worker::WorkerState;
use contract_relay::{deployer, gateway, worker};

#[derive(Parser)]
#[command(name = "contract-relay")]
#[command(about = "Solidity deploy relay services", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "relay.toml")]
    config: PathBuf,

    #[command(subcommand)]
    service: Service,
}

#[derive(Subcommand)]
enum Service {
    /// Run the public-facing gateway
    Gateway,
    /// Run the middle-hop worker
    Worker,
    /// Run the compile-and-deploy service
    Deployer,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_exists = cli.config.exists();
    let config = if config_exists {
        load_config(&cli.config)?
    } else {
        RelayConfig::default()
    };

    observability::logging::init(&config.observability.log_level);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config.display(),
        "contract-relay starting"
    );
    if !config_exists {
        tracing::warn!(config = %cli.config.display(), "Config file not found, using defaults");
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => observability::metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    match cli.service {
        Service::Gateway => {
            tracing::info!(
                worker_url = %config.gateway.worker_url,
                forward_timeout_secs = config.gateway.forward_timeout_secs,
                "Gateway configured"
            );
            let listener = TcpListener::bind(&config.gateway.bind_address).await?;
            let state = GatewayState::new(config.gateway);
            HttpServer::new("gateway", gateway::router(state), &config.timeouts)
                .run(listener)
                .await?;
        }
        Service::Worker => {
            tracing::info!(
                deployer_url = %config.worker.deployer_url,
                forward_timeout_secs = config.worker.forward_timeout_secs,
                "Worker configured"
            );
            let listener = TcpListener::bind(&config.worker.bind_address).await?;
            let state = WorkerState::new(config.worker);
            HttpServer::new("worker", worker::router(state), &config.timeouts)
                .run(listener)
                .await?;
        }
        Service::Deployer => {
            let wallet = Wallet::from_env(config.blockchain.chain_id)?;
            let chain = ContractDeployer::connect(config.blockchain.clone(), wallet).await?;
            let compiler = Compiler::new(config.compiler.clone());
            tracing::info!(
                rpc_url = %config.blockchain.rpc_url,
                solc_path = %config.compiler.solc_path,
                "Deployer configured"
            );
            let listener = TcpListener::bind(&config.deployer.bind_address).await?;
            let state = DeployerState::new(config.deployer.clone(), compiler, chain);
            HttpServer::new("deployer", deployer::router(state), &config.timeouts)
                .run(listener)
                .await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
