//! Account management and transaction signing.
//!
//! # Security
//! - The private key is parsed once at startup and never logged or serialized
//! - The account is immutable and shared by reference; there is no global signer

use alloy::consensus::{SignableTransaction, TxEip1559, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::primitives::{Address, TxKind, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;

use crate::blockchain::types::{BlockchainError, BlockchainResult, SignedTransaction};

/// Environment variable that overrides the private key from the settings file.
pub const PRIVATE_KEY_ENV_VAR: &str = "SWAP_PRIVATE_KEY";

/// The single signing account owned by this process.
#[derive(Debug, Clone)]
pub struct Account {
    /// The underlying signer (private key).
    signer: PrivateKeySigner,
    /// Chain ID for EIP-155 replay protection.
    chain_id: u64,
}

impl Account {
    /// Create an account from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    /// * `chain_id` - Chain ID for transaction signing
    pub fn from_private_key(private_key_hex: &str, chain_id: u64) -> BlockchainResult<Self> {
        let key_hex = private_key_hex
            .trim()
            .strip_prefix("0x")
            .unwrap_or(private_key_hex.trim());

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))?;

        tracing::info!(
            address = %signer.address(),
            chain_id = chain_id,
            "Account initialized"
        );

        Ok(Self { signer, chain_id })
    }

    /// Get the account's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Get the chain ID this account signs for.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Sign a fully populated request into a broadcastable envelope.
    ///
    /// The request must carry a nonce, a gas limit and exactly one fee model.
    pub fn sign_transaction(&self, tx: &TransactionRequest) -> BlockchainResult<SignedTransaction> {
        let nonce = tx
            .nonce
            .ok_or_else(|| BlockchainError::MalformedTransaction("missing nonce".into()))?;
        let gas_limit = tx
            .gas
            .ok_or_else(|| BlockchainError::MalformedTransaction("missing gas limit".into()))?;
        let to = tx.to.unwrap_or(TxKind::Create);
        let value = tx.value.unwrap_or(U256::ZERO);
        let input = tx.input.input().cloned().unwrap_or_default();
        let chain_id = tx.chain_id.unwrap_or(self.chain_id);

        let envelope = match (tx.gas_price, tx.max_fee_per_gas) {
            (Some(_), Some(_)) => {
                return Err(BlockchainError::MalformedTransaction(
                    "both gasPrice and maxFeePerGas set".into(),
                ))
            }
            (None, None) => {
                return Err(BlockchainError::MalformedTransaction(
                    "no fee fields set".into(),
                ))
            }
            (None, Some(max_fee_per_gas)) => {
                let unsigned = TxEip1559 {
                    chain_id,
                    nonce,
                    gas_limit,
                    max_fee_per_gas,
                    max_priority_fee_per_gas: tx.max_priority_fee_per_gas.unwrap_or(0),
                    to,
                    value,
                    access_list: tx.access_list.clone().unwrap_or_default(),
                    input,
                };
                let signature = self
                    .signer
                    .sign_hash_sync(&unsigned.signature_hash())
                    .map_err(|e| BlockchainError::Wallet(format!("Signing failed: {}", e)))?;
                TxEnvelope::Eip1559(unsigned.into_signed(signature))
            }
            (Some(gas_price), None) => {
                let unsigned = TxLegacy {
                    chain_id: Some(chain_id),
                    nonce,
                    gas_price,
                    gas_limit,
                    to,
                    value,
                    input,
                };
                let signature = self
                    .signer
                    .sign_hash_sync(&unsigned.signature_hash())
                    .map_err(|e| BlockchainError::Wallet(format!("Signing failed: {}", e)))?;
                TxEnvelope::Legacy(unsigned.into_signed(signature))
            }
        };

        Ok(SignedTransaction {
            hash: *envelope.tx_hash(),
            raw: envelope.encoded_2718(),
        })
    }
}
