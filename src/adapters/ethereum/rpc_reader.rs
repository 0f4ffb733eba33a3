//! JSON-RPC contract reader
//!
//! Issues `eth_call` against the Liquid contract for each accessor using a
//! plain HTTP client rather than a full Ethereum SDK.

use crate::config::RpcConfig;
use crate::core::{ContractReadError, ContractReader, IndexerResult, TokenAmount};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// 4-byte function selectors of the contract accessors
pub struct Selectors;

impl Selectors {
    /// `totalSupply()`
    pub const TOTAL_SUPPLY: &'static str = "0x18160ddd";
    /// `getEthReserve()`
    pub const ETH_RESERVE: &'static str = "0x8a9118c0";
    /// `getTokenReserve()`
    pub const TOKEN_RESERVE: &'static str = "0xf1d9f88b";
    /// `INITIAL_EthReserve()`
    pub const INITIAL_ETH_RESERVE: &'static str = "0xfa59e6d4";
    /// `INITIAL_TokenReserve()`
    pub const INITIAL_TOKEN_RESERVE: &'static str = "0x24c0fb00";
}

/// RPC response wrapper
#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcError>,
}

/// RPC error structure
#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

pub struct RpcContractReader {
    url: String,
    contract: String,
    block_tag: String,
    pin_to_event_block: bool,
    agent: ureq::Agent,
}

impl RpcContractReader {
    pub fn new(config: &RpcConfig, contract: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(config.connect_timeout_secs))
            .timeout_read(Duration::from_secs(config.read_timeout_secs))
            .build();

        Self {
            url: config.endpoint.clone(),
            contract: contract.to_string(),
            block_tag: config.block_tag.clone(),
            pin_to_event_block: config.pin_to_event_block,
            agent,
        }
    }

    /// Block parameter for `eth_call`: the event block as a hex quantity, or
    /// the configured tag when pinning is off
    fn block_param(&self, block: u64) -> String {
        if self.pin_to_event_block {
            format!("0x{:x}", block)
        } else {
            self.block_tag.clone()
        }
    }

    fn request_body(&self, selector: &str, block: u64) -> Value {
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_call",
            "params": [{ "to": self.contract, "data": selector }, self.block_param(block)],
        })
    }

    /// Call a zero-argument accessor and decode its uint256 return value
    async fn call_uint(&self, method: &'static str, selector: &'static str, block: u64) -> IndexerResult<TokenAmount> {
        let body = self.request_body(selector, block);

        debug!("eth_call {} on {} at block {}", method, self.contract, block);

        // ureq is blocking, keep it off the runtime threads
        let response_body = tokio::task::spawn_blocking({
            let agent = self.agent.clone();
            let url = self.url.clone();
            let body = body.to_string();

            move || -> Result<String, String> {
                let response = agent
                    .post(&url)
                    .set("Content-Type", "application/json")
                    .send_string(&body)
                    .map_err(|e| e.to_string())?;
                response.into_string().map_err(|e| e.to_string())
            }
        })
        .await
        .map_err(|e| transport(method, e.to_string()))?
        .map_err(|reason| transport(method, reason))?;

        let response: RpcResponse = serde_json::from_str(&response_body)?;
        if let Some(error) = response.error {
            return Err(ContractReadError::Rpc {
                code: error.code,
                message: error.message,
            }
            .into());
        }

        let result = response.result.ok_or_else(|| ContractReadError::Decode {
            method: method.to_string(),
            reason: "no result in RPC response".to_string(),
        })?;

        Ok(decode_uint(method, &result)?)
    }
}

fn transport(method: &str, reason: String) -> ContractReadError {
    ContractReadError::Transport {
        method: method.to_string(),
        reason,
    }
}

/// Decode a 0x-prefixed 32-byte big-endian word into a signed amount
pub fn decode_uint(method: &str, hex_word: &str) -> Result<TokenAmount, ContractReadError> {
    let digits = hex_word.strip_prefix("0x").unwrap_or(hex_word);
    let bytes = hex::decode(digits).map_err(|e| ContractReadError::Decode {
        method: method.to_string(),
        reason: e.to_string(),
    })?;

    if bytes.len() != 32 {
        return Err(ContractReadError::Decode {
            method: method.to_string(),
            reason: format!("expected 32 bytes, got {}", bytes.len()),
        });
    }

    // Anything beyond 127 bits cannot be represented as a signed amount
    if bytes[..16].iter().any(|b| *b != 0) || bytes[16] & 0x80 != 0 {
        return Err(ContractReadError::Overflow {
            method: method.to_string(),
        });
    }

    let mut low = [0u8; 16];
    low.copy_from_slice(&bytes[16..]);
    Ok(i128::from_be_bytes(low))
}

#[async_trait]
impl ContractReader for RpcContractReader {
    async fn total_supply(&self, block: u64) -> IndexerResult<TokenAmount> {
        self.call_uint("totalSupply", Selectors::TOTAL_SUPPLY, block).await
    }

    async fn eth_reserve(&self, block: u64) -> IndexerResult<TokenAmount> {
        self.call_uint("getEthReserve", Selectors::ETH_RESERVE, block).await
    }

    async fn token_reserve(&self, block: u64) -> IndexerResult<TokenAmount> {
        self.call_uint("getTokenReserve", Selectors::TOKEN_RESERVE, block).await
    }

    async fn initial_eth_reserve(&self, block: u64) -> IndexerResult<TokenAmount> {
        self.call_uint("INITIAL_EthReserve", Selectors::INITIAL_ETH_RESERVE, block).await
    }

    async fn initial_token_reserve(&self, block: u64) -> IndexerResult<TokenAmount> {
        self.call_uint("INITIAL_TokenReserve", Selectors::INITIAL_TOKEN_RESERVE, block).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::LIQUID_CONTRACT_ADDRESS;

    #[test]
    fn test_decode_uint_word() {
        let word = format!("0x{:064x}", 1_000_000_000_000_000_000_000u128);
        assert_eq!(decode_uint("totalSupply", &word).unwrap(), 1_000_000_000_000_000_000_000);
        assert_eq!(decode_uint("totalSupply", &format!("0x{}", "0".repeat(64))).unwrap(), 0);
    }

    #[test]
    fn test_decode_uint_rejects_bad_words() {
        assert!(matches!(
            decode_uint("getEthReserve", "0x1234"),
            Err(ContractReadError::Decode { .. })
        ));
        assert!(matches!(
            decode_uint("getEthReserve", &format!("0x{}", "f".repeat(64))),
            Err(ContractReadError::Overflow { .. })
        ));
        assert!(matches!(
            decode_uint("getEthReserve", "0xzz"),
            Err(ContractReadError::Decode { .. })
        ));
    }

    #[tokio::test]
    async fn test_reader_creation() {
        let reader = RpcContractReader::new(&RpcConfig::default(), LIQUID_CONTRACT_ADDRESS);
        assert_eq!(reader.url, RpcConfig::default().endpoint);
        assert_eq!(reader.block_tag, "latest");
    }

    #[test]
    fn test_eth_call_is_pinned_to_event_block() {
        let reader = RpcContractReader::new(&RpcConfig::default(), LIQUID_CONTRACT_ADDRESS);
        let body = reader.request_body(Selectors::TOTAL_SUPPLY, 11_731_587);

        assert_eq!(body["method"], "eth_call");
        assert_eq!(body["params"][0]["data"], Selectors::TOTAL_SUPPLY);
        assert_eq!(body["params"][0]["to"], LIQUID_CONTRACT_ADDRESS);
        assert_eq!(body["params"][1], "0xb30283");
    }

    #[test]
    fn test_block_tag_used_when_pinning_disabled() {
        let config = RpcConfig {
            pin_to_event_block: false,
            block_tag: "safe".to_string(),
            ..RpcConfig::default()
        };
        let reader = RpcContractReader::new(&config, LIQUID_CONTRACT_ADDRESS);

        assert_eq!(reader.request_body(Selectors::ETH_RESERVE, 11_731_587)["params"][1], "safe");
    }

    #[tokio::test]
    async fn test_unreachable_node_is_transport_error() {
        let config = RpcConfig {
            endpoint: "http://127.0.0.1:9".to_string(),
            connect_timeout_secs: 1,
            read_timeout_secs: 1,
            ..RpcConfig::default()
        };
        let reader = RpcContractReader::new(&config, LIQUID_CONTRACT_ADDRESS);

        let err = reader.total_supply(11_731_587).await.unwrap_err();
        assert!(matches!(
            err,
            crate::core::IndexerError::ContractRead(ContractReadError::Transport { .. })
        ));
    }
}
