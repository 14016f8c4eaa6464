//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment variable (private key)
//!     → wallet.rs (key loading, signing identity)
//!     → client.rs (RPC queries with timeouts)
//!     → deploy.rs (creation tx submit, bounded confirmation wait)
//! ```
//!
//! # Security Constraints
//! - The private key comes ONLY from the environment, once, at startup
//! - Never log private keys or sensitive data
//! - All RPC calls and the confirmation wait have configurable deadlines

pub mod client;
pub mod deploy;
pub mod types;
pub mod wallet;

pub use client::ChainClient;
pub use deploy::ContractDeployer;
pub use types::{BlockchainError, BlockchainResult, DeploymentReceipt};
pub use wallet::Wallet;
