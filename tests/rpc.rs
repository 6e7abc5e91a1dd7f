//! Blockchain client against a local JSON-RPC backend.

use alloy::primitives::Address;
use serde_json::json;

use odos_swapper::blockchain::types::BlockchainError;
use odos_swapper::blockchain::{BlockchainClient, BlockchainConfig, ChainId, ChainRpc};

mod common;
use common::*;

fn client(rpc_url: String, failover_urls: Vec<String>) -> BlockchainClient {
    BlockchainClient::new(BlockchainConfig {
        rpc_url,
        failover_urls,
        chain_id: CHAIN_ID,
        rpc_timeout_secs: 5,
        proxy: None,
    })
    .unwrap()
}

#[tokio::test]
async fn test_chain_id_mismatch_is_rejected() {
    let addr = start_json_rpc_backend(vec![("eth_chainId", json!("0x1"))]).await;
    let client = client(format!("http://{}", addr), Vec::new());

    let err = client.verify_chain_id().await.unwrap_err();

    assert!(matches!(
        err,
        BlockchainError::ChainMismatch {
            expected: CHAIN_ID,
            actual: 1
        }
    ));
}

#[tokio::test]
async fn test_matching_chain_id_is_accepted() {
    let addr = start_json_rpc_backend(vec![("eth_chainId", json!("0xa4b1"))]).await;
    let client = client(format!("http://{}", addr), Vec::new());

    assert_eq!(client.verify_chain_id().await.unwrap(), ChainId(CHAIN_ID));
}

#[tokio::test]
async fn test_nonce_read_from_primary() {
    let addr = start_json_rpc_backend(vec![("eth_getTransactionCount", json!("0x7"))]).await;
    let client = client(format!("http://{}", addr), Vec::new());

    let nonce = client
        .get_transaction_count(Address::repeat_byte(0x01))
        .await
        .unwrap();
    assert_eq!(nonce, 7);
}

#[tokio::test]
async fn test_nonce_never_read_from_failover() {
    let failover = start_json_rpc_backend(vec![
        ("eth_chainId", json!("0xa4b1")),
        ("eth_getTransactionCount", json!("0x7")),
    ])
    .await;
    // Nothing listens on the primary.
    let client = client(
        "http://127.0.0.1:1".to_string(),
        vec![format!("http://{}", failover)],
    );

    // Plain reads fail over.
    assert_eq!(client.get_chain_id().await.unwrap(), CHAIN_ID);

    let err = client
        .get_transaction_count(Address::repeat_byte(0x01))
        .await
        .unwrap_err();
    assert!(matches!(err, BlockchainError::Rpc(_)));
}
