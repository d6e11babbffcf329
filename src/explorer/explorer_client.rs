use ethers::types::Address;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, instrument};
use url::Url;

use super::explorer_types::{ExplorerResponse, NormalTx, TokenTransfer};
use crate::config::Config;

/// Message the explorer pairs with `status == "0"` when an account simply has no records.
pub const NO_TRANSACTIONS_FOUND: &str = "No transactions found";

#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("HTTP request to explorer failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Explorer API error: {message} (result: {result})")]
    Api { message: String, result: Value },
    #[error("Unexpected explorer payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid explorer URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Thin client over the `account` module of an Etherscan-compatible API.
#[derive(Debug, Clone)]
pub struct ExplorerClient {
    http_client: Client,
    base_url: Url,
    api_key: String,
}

impl ExplorerClient {
    pub fn new(config: &Config) -> Result<Self, ExplorerError> {
        let http_client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        let base_url = Url::parse(&config.explorer_api_url)?;

        Ok(Self {
            http_client,
            base_url,
            api_key: config.explorer_api_key.clone(),
        })
    }

    /// Normal transactions sent or received by `address`, oldest first
    #[instrument(skip(self))]
    pub async fn get_normal_txs(
        &self,
        address: Address,
        start_block: u64,
        end_block: u64,
    ) -> Result<Vec<NormalTx>, ExplorerError> {
        let txs: Vec<NormalTx> = self.account_records("txlist", address, start_block, end_block).await?;
        info!(count = txs.len(), "Fetched normal transactions");
        Ok(txs)
    }

    /// ERC-20 transfer events involving `address`, oldest first
    #[instrument(skip(self))]
    pub async fn get_erc20_transfers(
        &self,
        address: Address,
        start_block: u64,
        end_block: u64,
    ) -> Result<Vec<TokenTransfer>, ExplorerError> {
        let transfers: Vec<TokenTransfer> = self.account_records("tokentx", address, start_block, end_block).await?;
        info!(count = transfers.len(), "Fetched ERC-20 transfers");
        Ok(transfers)
    }

    async fn account_records<T: DeserializeOwned>(
        &self,
        action: &str,
        address: Address,
        start_block: u64,
        end_block: u64,
    ) -> Result<Vec<T>, ExplorerError> {
        let params = [
            ("module", "account".to_string()),
            ("action", action.to_string()),
            ("address", format!("{:?}", address)),
            ("startblock", start_block.to_string()),
            ("endblock", end_block.to_string()),
            ("sort", "asc".to_string()),
            ("apikey", self.api_key.clone()),
        ];

        let response = self
            .http_client
            .get(self.base_url.clone())
            .query(&params)
            .send()
            .await?
            .error_for_status()?;

        let envelope: ExplorerResponse = response.json().await?;
        debug!(action, status = %envelope.status, message = %envelope.message, "Explorer response received");
        parse_records(envelope)
    }
}

/// Unwraps the `{status, message, result}` envelope into typed records.
pub fn parse_records<T: DeserializeOwned>(envelope: ExplorerResponse) -> Result<Vec<T>, ExplorerError> {
    let ExplorerResponse { status, message, result } = envelope;
    if status == "0" && message != NO_TRANSACTIONS_FOUND {
        return Err(ExplorerError::Api { message, result });
    }

    match result {
        Value::Array(_) => Ok(serde_json::from_value(result)?),
        Value::Null => Ok(Vec::new()),
        _ if status == "0" => Ok(Vec::new()),
        other => Ok(serde_json::from_value(other)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: Value) -> ExplorerResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_success_envelope_decodes_records() {
        let env = envelope(json!({
            "status": "1",
            "message": "OK",
            "result": [{
                "hash": "0xabc",
                "timeStamp": "1700000000",
                "to": "0x2626664c2603336e57b271c5c0b26f421741e481",
                "value": "0",
                "isError": "0"
            }]
        }));
        let txs: Vec<NormalTx> = parse_records(env).unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].hash, "0xabc");
        assert!(txs[0].succeeded());
    }

    #[test]
    fn test_no_transactions_found_is_empty() {
        let env = envelope(json!({
            "status": "0",
            "message": "No transactions found",
            "result": []
        }));
        let txs: Vec<TokenTransfer> = parse_records(env).unwrap();
        assert!(txs.is_empty());
    }

    #[test]
    fn test_failure_status_is_api_error() {
        let env = envelope(json!({
            "status": "0",
            "message": "NOTOK",
            "result": "Invalid API Key"
        }));
        let err = parse_records::<NormalTx>(env).unwrap_err();
        match err {
            ExplorerError::Api { message, result } => {
                assert_eq!(message, "NOTOK");
                assert_eq!(result, json!("Invalid API Key"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_record_is_decode_error() {
        let env = envelope(json!({
            "status": "1",
            "message": "OK",
            "result": [{ "hash": "0xabc" }]
        }));
        let err = parse_records::<NormalTx>(env).unwrap_err();
        assert!(matches!(err, ExplorerError::Decode(_)));
    }
}
