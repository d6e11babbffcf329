use std::str::FromStr;
use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};

// Etherscan-compatible response envelope.
// `result` is a record list on success, and a string or list on failure.
#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerResponse {
    pub status: String,
    pub message: String,
    #[serde(default)]
    pub result: serde_json::Value,
}

/// A normal (externally-owned account) transaction from `account/txlist`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalTx {
    pub hash: String,
    #[serde(rename = "blockNumber", default)]
    pub block_number: String,
    #[serde(rename = "timeStamp")]
    pub time_stamp: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: Option<String>, // empty or null for contract creations
    #[serde(default)]
    pub value: String, // wei, decimal string
    #[serde(rename = "isError", default)]
    pub is_error: String, // "0" on success, anything else (including absent) is a failure
}

impl NormalTx {
    pub fn timestamp(&self) -> Option<u64> {
        self.time_stamp.parse().ok()
    }

    /// Destination as an address; `None` when empty or malformed
    pub fn to_address(&self) -> Option<Address> {
        match self.to.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Address::from_str(raw).ok(),
            _ => None,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.is_error == "0"
    }

    pub fn value_wei(&self) -> U256 {
        U256::from_dec_str(&self.value).unwrap_or_default()
    }
}

/// An ERC-20 transfer event from `account/tokentx`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenTransfer {
    pub hash: String,
    #[serde(rename = "blockNumber", default)]
    pub block_number: String,
    #[serde(rename = "timeStamp")]
    pub time_stamp: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub value: String,
    #[serde(rename = "contractAddress", default)]
    pub contract_address: Option<String>,
    #[serde(rename = "tokenSymbol", default)]
    pub token_symbol: String,
    #[serde(rename = "tokenDecimal", default)]
    pub token_decimal: String,
}

impl TokenTransfer {
    pub fn timestamp(&self) -> Option<u64> {
        self.time_stamp.parse().ok()
    }

    pub fn token_address(&self) -> Option<Address> {
        match self.contract_address.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Address::from_str(raw).ok(),
            _ => None,
        }
    }
}
