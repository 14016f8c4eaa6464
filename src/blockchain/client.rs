//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint
//! - Query chain state (chain id, block number, receipts)
//! - Bound every RPC call with the configured timeout

use std::time::Duration;

use alloy::primitives::TxHash;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionReceipt;
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::config::schema::ChainConfig;

/// Read-only RPC client used for chain queries.
#[derive(Clone)]
pub struct ChainClient {
    provider: DynProvider,
    config: ChainConfig,
    timeout_duration: Duration,
}

impl ChainClient {
    /// Create a client against the configured RPC endpoint.
    ///
    /// Connection is lazy; a dead endpoint surfaces on the first query.
    pub fn new(config: ChainConfig) -> BlockchainResult<Self> {
        let rpc_url: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;

        let provider = ProviderBuilder::new().connect_http(rpc_url).erased();

        Ok(Self {
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
            provider,
            config,
        })
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id != self.config.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.config.chain_id,
                actual: chain_id,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<u64> {
        self.bounded("eth_chainId", self.provider.get_chain_id()).await
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        self.bounded("eth_blockNumber", self.provider.get_block_number())
            .await
    }

    /// Get a transaction receipt by hash, `None` while still pending.
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<Option<TransactionReceipt>> {
        self.bounded(
            "eth_getTransactionReceipt",
            self.provider.get_transaction_receipt(tx_hash),
        )
        .await
    }

    /// Get the configuration.
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Number of confirmation blocks required for finality.
    pub fn confirmation_blocks(&self) -> u32 {
        self.config.confirmation_blocks
    }

    async fn bounded<T, E, F>(&self, method: &'static str, fut: F) -> BlockchainResult<T>
    where
        E: std::fmt::Display,
        F: std::future::Future<Output = Result<T, E>>,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => Err(BlockchainError::Rpc(format!("{} failed: {}", method, e))),
            Err(_) => {
                tracing::warn!(method = method, "RPC timeout");
                Err(BlockchainError::Timeout(self.config.rpc_timeout_secs))
            }
        }
    }
}

impl std::fmt::Debug for ChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_rpc_url_rejected() {
        let config = ChainConfig {
            rpc_url: "not a url".to_string(),
            ..ChainConfig::default()
        };
        let result = ChainClient::new(config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid RPC URL"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_fails_on_query_not_creation() {
        // Port 9 is the discard service; nothing speaks JSON-RPC there.
        let config = ChainConfig {
            rpc_url: "http://127.0.0.1:9".to_string(),
            rpc_timeout_secs: 1,
            ..ChainConfig::default()
        };
        let client = ChainClient::new(config).unwrap();
        assert!(client.get_chain_id().await.is_err());
    }
}
