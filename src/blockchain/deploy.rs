//! Contract deployment: creation transaction submit and confirmation wait.
//!
//! # Responsibilities
//! - Build the creation transaction from a compiled artifact
//! - Sign and broadcast through the wallet-backed provider
//! - Poll for the receipt under a bounded deadline
//! - Enforce the configured confirmation depth

use std::time::Duration;

use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::TxHash;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::Signer;
use tokio::time::{interval, timeout};

use crate::blockchain::client::ChainClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult, DeploymentReceipt};
use crate::blockchain::wallet::Wallet;
use crate::config::schema::ChainConfig;
use crate::solc::Artifact;

/// Interval between receipt polls while waiting for confirmation.
const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Submits creation transactions and waits for them to confirm.
///
/// Gas, nonce, and fee fields are filled by the provider's default fillers;
/// there is no manual override path.
pub struct ContractDeployer {
    /// Wallet-backed provider used for submission.
    provider: DynProvider,
    /// Read-only client used for bounded receipt/block queries.
    client: ChainClient,
    wallet: Wallet,
    config: ChainConfig,
}

impl ContractDeployer {
    /// Connect a deployer for the configured chain.
    ///
    /// Chain ID verification failure is logged but not fatal, so the service
    /// can start while the node is still coming up.
    pub async fn connect(config: ChainConfig, wallet: Wallet) -> BlockchainResult<Self> {
        let rpc_url: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;

        let signer = wallet.signer().clone().with_chain_id(Some(config.chain_id));
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(rpc_url)
            .erased();

        let client = ChainClient::new(config.clone())?;

        match client.verify_chain_id().await {
            Ok(()) => {
                tracing::info!(
                    rpc_url = %config.rpc_url,
                    chain_id = config.chain_id,
                    deployer = %wallet.address(),
                    "Deployment signer connected"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Deployment signer connected but chain verification failed"
                );
            }
        }

        Ok(Self {
            provider,
            client,
            wallet,
            config,
        })
    }

    /// Deploy a compiled artifact and block until it confirms.
    pub async fn deploy(&self, artifact: &Artifact) -> BlockchainResult<DeploymentReceipt> {
        let tx = TransactionRequest::default().with_deploy_code(artifact.bytecode.clone());

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| BlockchainError::Rpc(format!("failed to submit deployment: {}", e)))?;
        let tx_hash = *pending.tx_hash();

        tracing::info!(
            contract = %artifact.name,
            tx_hash = %tx_hash,
            from = %self.wallet.address(),
            "Deployment transaction submitted"
        );

        self.wait_for_confirmation(tx_hash).await
    }

    /// Poll for the receipt until the required confirmation depth, bounded
    /// by the configured deadline.
    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> BlockchainResult<DeploymentReceipt> {
        let required = self.client.confirmation_blocks();
        let deadline = Duration::from_secs(self.config.confirmation_timeout_secs);

        let result = timeout(deadline, async {
            let mut ticker = interval(POLL_INTERVAL);

            loop {
                ticker.tick().await;

                let receipt = match self.client.get_transaction_receipt(tx_hash).await? {
                    Some(r) => r,
                    None => {
                        tracing::debug!(tx_hash = %tx_hash, "Deployment pending");
                        continue;
                    }
                };

                if !receipt.status() {
                    return Err(BlockchainError::Reverted(format!(
                        "transaction {} reverted on-chain",
                        tx_hash
                    )));
                }

                let contract_address = receipt
                    .contract_address
                    .ok_or(BlockchainError::MissingContractAddress(tx_hash))?;

                let current_block = self.client.get_block_number().await?;
                let tx_block = receipt.block_number.unwrap_or(current_block);
                // Inclusion counts as the first confirmation.
                let confirmations = current_block.saturating_sub(tx_block) as u32 + 1;

                if confirmations >= required {
                    return Ok(DeploymentReceipt {
                        contract_address,
                        transaction_hash: tx_hash,
                        block_number: tx_block,
                    });
                }

                tracing::debug!(
                    tx_hash = %tx_hash,
                    confirmations = confirmations,
                    required = required,
                    "Waiting for confirmations"
                );
            }
        })
        .await;

        match result {
            Ok(receipt) => receipt,
            Err(_) => Err(BlockchainError::ConfirmationTimeout(
                self.config.confirmation_timeout_secs,
            )),
        }
    }

    /// The signing address deployments are sent from.
    pub fn address(&self) -> alloy::primitives::Address {
        self.wallet.address()
    }
}

impl std::fmt::Debug for ContractDeployer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractDeployer")
            .field("chain_id", &self.config.chain_id)
            .field("deployer", &self.wallet.address())
            .finish()
    }
}
