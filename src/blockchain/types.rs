//! Chain-specific types and error definitions.

use alloy::primitives::{Address, TxHash};
use thiserror::Error;

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Deployment was not confirmed within the deadline.
    #[error("deployment not confirmed within {0} seconds")]
    ConfirmationTimeout(u64),

    /// The creation transaction was reverted on-chain.
    #[error("deployment transaction reverted: {0}")]
    Reverted(String),

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Mined receipt carries no contract address.
    #[error("receipt for {0} carries no contract address")]
    MissingContractAddress(TxHash),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Outcome of a confirmed deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentReceipt {
    /// Address the contract now lives at.
    pub contract_address: Address,
    /// Hash of the creation transaction.
    pub transaction_hash: TxHash,
    /// Block the transaction was included in.
    pub block_number: u64,
}
