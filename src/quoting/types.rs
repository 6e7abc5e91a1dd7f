//! Wire types of the swap-routing API.

use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Deserializer, Serialize};

/// Slippage tolerance sent with every quote, in percent.
pub const SLIPPAGE_LIMIT_PERCENT: f64 = 0.5;

/// One input leg of a quote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InputToken {
    pub token_address: Address,
    /// Smallest-unit amount as a decimal string.
    pub amount: String,
}

/// One output leg of a quote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutputToken {
    pub token_address: Address,
    pub proportion: f64,
}

/// Body of `POST /sor/quote/v2`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub chain_id: u64,
    pub input_tokens: Vec<InputToken>,
    pub output_tokens: Vec<OutputToken>,
    pub slippage_limit_percent: f64,
    pub user_addr: Address,
}

impl QuoteRequest {
    /// Quote for converting all of `amount` of one token into another.
    pub fn single(
        chain_id: u64,
        input_token: Address,
        amount: U256,
        output_token: Address,
        user: Address,
    ) -> Self {
        Self {
            chain_id,
            input_tokens: vec![InputToken {
                token_address: input_token,
                amount: amount.to_string(),
            }],
            output_tokens: vec![OutputToken {
                token_address: output_token,
                proportion: 1.0,
            }],
            slippage_limit_percent: SLIPPAGE_LIMIT_PERCENT,
            user_addr: user,
        }
    }
}

/// Response of the quote endpoint; only `pathId` is required downstream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub path_id: String,
    #[serde(default)]
    pub out_amounts: Vec<String>,
    #[serde(default)]
    pub gas_estimate: Option<f64>,
    #[serde(default)]
    pub price_impact: Option<f64>,
}

/// Body of `POST /sor/assemble`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssembleRequest {
    pub path_id: String,
    pub user_addr: Address,
}

/// Response of the assemble endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AssembleResponse {
    pub transaction: AssembledTransaction,
}

/// Executable transaction produced by the routing service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssembledTransaction {
    pub to: Address,
    pub from: Address,
    pub data: Bytes,
    #[serde(deserialize_with = "de_u64")]
    pub chain_id: u64,
    #[serde(deserialize_with = "de_u64")]
    pub gas: u64,
    #[serde(deserialize_with = "de_u128")]
    pub gas_price: u128,
    #[serde(deserialize_with = "de_u64")]
    pub nonce: u64,
    #[serde(default, deserialize_with = "de_u256")]
    pub value: U256,
}

/// Accept a JSON number, a decimal string or a `0x` hex string.
fn quantity(value: &serde_json::Value) -> Result<u128, String> {
    match value {
        serde_json::Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                return Ok(v as u128);
            }
            match n.as_f64() {
                Some(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 => Ok(f as u128),
                _ => Err(format!("not an unsigned integer: {}", n)),
            }
        }
        serde_json::Value::String(s) => match s.strip_prefix("0x") {
            Some(hex) => u128::from_str_radix(hex, 16).map_err(|e| format!("'{}': {}", s, e)),
            None => s.parse::<u128>().map_err(|e| format!("'{}': {}", s, e)),
        },
        other => Err(format!("unexpected quantity {}", other)),
    }
}

fn de_u128<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    quantity(&value).map_err(serde::de::Error::custom)
}

fn de_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let v = de_u128(deserializer)?;
    u64::try_from(v).map_err(|_| serde::de::Error::custom(format!("{} overflows u64", v)))
}

fn de_u256<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
    de_u128(deserializer).map(U256::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_request_body() {
        let request = QuoteRequest::single(
            42161,
            Address::repeat_byte(0x82),
            U256::from(1_000_000_000_000_000_000u64),
            Address::repeat_byte(0xaf),
            Address::repeat_byte(0x11),
        );
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["chainId"], 42161);
        assert_eq!(json["inputTokens"][0]["amount"], "1000000000000000000");
        assert_eq!(json["outputTokens"][0]["proportion"], 1.0);
        assert_eq!(json["slippageLimitPercent"], 0.5);
        assert!(json["userAddr"].is_string());
    }

    #[test]
    fn test_quote_response_ignores_unknown_fields() {
        let response: QuoteResponse = serde_json::from_str(
            r#"{"pathId":"abc","outAmounts":["123"],"gasEstimate":180000.0,"blockNumber":1}"#,
        )
        .unwrap();
        assert_eq!(response.path_id, "abc");
        assert_eq!(response.out_amounts, vec!["123".to_string()]);
    }

    #[test]
    fn test_assembled_transaction_mixed_quantities() {
        let response: AssembleResponse = serde_json::from_str(
            r#"{
                "transaction": {
                    "to": "0xa669e7a0d4b3e4fa48af2de86bd4cd7126be4e13",
                    "from": "0x1111111111111111111111111111111111111111",
                    "data": "0x83bd37f9",
                    "chainId": 42161,
                    "gas": "0x2bf20",
                    "gasPrice": 10000000,
                    "nonce": "7",
                    "value": "0"
                }
            }"#,
        )
        .unwrap();

        let tx = response.transaction;
        assert_eq!(tx.gas, 180_000);
        assert_eq!(tx.gas_price, 10_000_000);
        assert_eq!(tx.nonce, 7);
        assert_eq!(tx.value, U256::ZERO);
        assert_eq!(tx.data.as_ref(), &[0x83, 0xbd, 0x37, 0xf9]);
    }

    #[test]
    fn test_quantity_rejects_garbage() {
        assert!(quantity(&serde_json::json!(-1)).is_err());
        assert!(quantity(&serde_json::json!("ten")).is_err());
        assert!(quantity(&serde_json::json!(1.5)).is_err());
        assert!(quantity(&serde_json::json!(null)).is_err());
    }
}
