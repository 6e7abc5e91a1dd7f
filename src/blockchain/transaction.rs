//! Transaction assembly, signing and broadcast.
//!
//! # Responsibilities
//! - Stamp sender, chain ID and a freshly fetched nonce onto each request
//! - Size the gas limit from a simulation when the caller has none
//! - Sign and submit exactly once

use alloy::primitives::TxHash;
use alloy::rpc::types::TransactionRequest;
use std::sync::Arc;

use crate::blockchain::rpc::ChainRpc;
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::blockchain::wallet::Account;

/// `estimate * 1.5`, floored.
pub fn padded_gas_limit(estimate: u64) -> u64 {
    estimate.saturating_mul(3) / 2
}

/// Signs and submits transactions for the process account.
#[derive(Clone)]
pub struct TransactionBroadcaster {
    rpc: Arc<dyn ChainRpc>,
    account: Arc<Account>,
}

impl TransactionBroadcaster {
    pub fn new(rpc: Arc<dyn ChainRpc>, account: Arc<Account>) -> Self {
        Self { rpc, account }
    }

    /// Sign and broadcast a request, returning its hash.
    ///
    /// # Arguments
    /// * `request` - Destination, value, calldata and fee fields
    /// * `skip_gas_estimate` - Trust `request.gas` instead of simulating
    pub async fn broadcast(
        &self,
        mut request: TransactionRequest,
        skip_gas_estimate: bool,
    ) -> BlockchainResult<TxHash> {
        let from = self.account.address();
        request.from = Some(from);
        request.chain_id = Some(self.account.chain_id());
        request.nonce = Some(self.rpc.get_transaction_count(from).await?);

        if skip_gas_estimate {
            if request.gas.is_none() {
                return Err(BlockchainError::MalformedTransaction(
                    "gas estimate skipped but no gas limit supplied".into(),
                ));
            }
        } else {
            let estimate = self.rpc.estimate_gas(&request).await?;
            request.gas = Some(padded_gas_limit(estimate));
        }

        let signed = self.account.sign_transaction(&request)?;
        tracing::debug!(
            nonce = request.nonce,
            gas = request.gas,
            tx_hash = %signed.hash,
            "Transaction signed"
        );

        let tx_hash = self.rpc.send_raw_transaction(&signed.raw).await?;
        if tx_hash != signed.hash {
            tracing::warn!(
                local = %signed.hash,
                remote = %tx_hash,
                "Node reported a different transaction hash"
            );
        }

        tracing::info!(tx_hash = %tx_hash, nonce = request.nonce, "Transaction sent");
        Ok(tx_hash)
    }
}
