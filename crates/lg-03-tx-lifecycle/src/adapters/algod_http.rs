//! # Ledger HTTP Adapter
//!
//! REST client for the ledger node (`/v2/...`). Every request carries the
//! API token in the `X-Algo-API-Token` header; JSON responses are decoded
//! into the typed port records here.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use shared_types::{Address, ApplicationIndex, OperationId, Round};
use tracing::debug;

use crate::error::LedgerError;
use crate::ports::{
    AccountInfo, CompiledProgram, LedgerClient, NodeStatus, PendingTransactionInfo,
    SuggestedParams,
};

/// Header carrying the ledger API token.
pub const ALGOD_TOKEN_HEADER: &str = "X-Algo-API-Token";

/// Validity window applied to suggested parameters.
pub const VALIDITY_WINDOW: Round = 1000;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
// Round waits block server-side until the next block.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

// =============================================================================
// WIRE RECORDS
// =============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ParamsResponse {
    #[serde(default)]
    fee: u64,
    #[serde(default)]
    min_fee: u64,
    last_round: Round,
    genesis_id: String,
    genesis_hash: String,
}

#[derive(Deserialize)]
struct CompileResponse {
    hash: String,
    result: String,
}

#[derive(Deserialize)]
struct SubmitResponse {
    #[serde(rename = "txId")]
    tx_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct StatusResponse {
    last_round: Round,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct PendingResponse {
    #[serde(default)]
    confirmed_round: Round,
    #[serde(default)]
    pool_error: String,
    #[serde(default)]
    application_index: Option<ApplicationIndex>,
}

#[derive(Deserialize)]
struct AccountResponse {
    address: String,
    amount: u64,
    #[serde(default)]
    round: Round,
}

#[derive(Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: String,
}

impl ParamsResponse {
    fn into_params(self) -> Result<SuggestedParams, LedgerError> {
        let hash = BASE64
            .decode(&self.genesis_hash)
            .map_err(|e| LedgerError::Decode(format!("genesis hash: {e}")))?;
        let genesis_hash: [u8; 32] = hash
            .as_slice()
            .try_into()
            .map_err(|_| LedgerError::Decode(format!("genesis hash has {} bytes", hash.len())))?;

        Ok(SuggestedParams {
            fee: self.fee,
            min_fee: self.min_fee,
            first_valid: self.last_round,
            last_valid: self.last_round + VALIDITY_WINDOW,
            genesis_id: self.genesis_id,
            genesis_hash,
        })
    }
}

impl From<PendingResponse> for PendingTransactionInfo {
    fn from(response: PendingResponse) -> Self {
        Self {
            confirmed_round: response.confirmed_round,
            pool_error: response.pool_error,
            application_index: response.application_index,
        }
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// HTTP client for the ledger node.
pub struct AlgodHttpClient {
    client: Client,
    base_url: String,
    token: String,
}

impl AlgodHttpClient {
    /// Creates a client for the node at `base_url` (e.g. `http://localhost:4001`).
    ///
    /// # Errors
    ///
    /// [`LedgerError::Connection`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, LedgerError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| LedgerError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<R: DeserializeOwned>(&self, request: RequestBuilder) -> Result<R, LedgerError> {
        let response = request
            .header(ALGOD_TOKEN_HEADER, &self.token)
            .send()
            .await
            .map_err(|e| LedgerError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|e| e.message)
                .unwrap_or_default();
            return Err(LedgerError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<R>()
            .await
            .map_err(|e| LedgerError::Decode(e.to_string()))
    }

    async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, LedgerError> {
        debug!(path, "GET ledger");
        self.send(self.client.get(self.url(path))).await
    }
}

#[async_trait]
impl LedgerClient for AlgodHttpClient {
    async fn suggested_params(&self) -> Result<SuggestedParams, LedgerError> {
        let response: ParamsResponse = self.get("/v2/transactions/params").await?;
        response.into_params()
    }

    async fn compile(&self, source: &str) -> Result<CompiledProgram, LedgerError> {
        debug!(bytes = source.len(), "POST ledger compile");
        let request = self
            .client
            .post(self.url("/v2/teal/compile"))
            .header(CONTENT_TYPE, "text/plain")
            .body(source.to_string());
        let response: CompileResponse = self.send(request).await?;

        let program = BASE64
            .decode(&response.result)
            .map_err(|e| LedgerError::Decode(format!("compiled program: {e}")))?;
        Ok(CompiledProgram {
            hash: response.hash,
            program,
        })
    }

    async fn submit(&self, signed: &[u8]) -> Result<OperationId, LedgerError> {
        debug!(bytes = signed.len(), "POST ledger transaction");
        let request = self
            .client
            .post(self.url("/v2/transactions"))
            .header(CONTENT_TYPE, "application/x-binary")
            .body(signed.to_vec());
        let response: SubmitResponse = self.send(request).await?;
        Ok(OperationId::new(response.tx_id))
    }

    async fn status(&self) -> Result<NodeStatus, LedgerError> {
        let response: StatusResponse = self.get("/v2/status").await?;
        Ok(NodeStatus {
            last_round: response.last_round,
        })
    }

    async fn status_after_round(&self, round: Round) -> Result<NodeStatus, LedgerError> {
        let response: StatusResponse = self
            .get(&format!("/v2/status/wait-for-block-after/{round}"))
            .await?;
        Ok(NodeStatus {
            last_round: response.last_round,
        })
    }

    async fn pending_transaction_info(
        &self,
        id: &OperationId,
    ) -> Result<PendingTransactionInfo, LedgerError> {
        let response: PendingResponse = self
            .get(&format!("/v2/transactions/pending/{id}?format=json"))
            .await?;
        Ok(response.into())
    }

    async fn account_info(&self, address: &Address) -> Result<AccountInfo, LedgerError> {
        let response: AccountResponse = self
            .get(&format!("/v2/accounts/{address}?format=json"))
            .await?;
        let address = response
            .address
            .parse()
            .map_err(|e: shared_types::AddressError| LedgerError::Decode(e.to_string()))?;
        Ok(AccountInfo {
            address,
            amount: response.amount,
            round: response.round,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_decoding() {
        let json = serde_json::json!({
            "consensus-version": "future",
            "fee": 0,
            "genesis-hash": BASE64.encode([9u8; 32]),
            "genesis-id": "testnet-v1.0",
            "last-round": 500,
            "min-fee": 1000
        });
        let response: ParamsResponse = serde_json::from_value(json).unwrap();
        let params = response.into_params().unwrap();

        assert_eq!(params.first_valid, 500);
        assert_eq!(params.last_valid, 1500);
        assert_eq!(params.genesis_hash, [9u8; 32]);
        assert_eq!(params.min_fee, 1000);
    }

    #[test]
    fn test_bad_genesis_hash() {
        let json = serde_json::json!({
            "genesis-hash": BASE64.encode([9u8; 8]),
            "genesis-id": "x",
            "last-round": 1
        });
        let response: ParamsResponse = serde_json::from_value(json).unwrap();
        assert!(matches!(response.into_params(), Err(LedgerError::Decode(_))));
    }

    #[test]
    fn test_pending_decoding() {
        let pending: PendingResponse =
            serde_json::from_value(serde_json::json!({"pool-error": ""})).unwrap();
        let info = PendingTransactionInfo::from(pending);
        assert!(!info.is_confirmed());
        assert!(!info.is_rejected());

        let confirmed: PendingResponse = serde_json::from_value(serde_json::json!({
            "confirmed-round": 77,
            "pool-error": "",
            "application-index": 392
        }))
        .unwrap();
        let info = PendingTransactionInfo::from(confirmed);
        assert_eq!(info.confirmed_round, 77);
        assert_eq!(info.application_index, Some(392));
    }

    #[test]
    fn test_submit_response_field() {
        let response: SubmitResponse =
            serde_json::from_value(serde_json::json!({"txId": "ABC"})).unwrap();
        assert_eq!(response.tx_id, "ABC");
    }
}
