//! # Key-Custody HTTP Adapter
//!
//! REST client for the key-management daemon (`/v1/...`). Every request
//! carries the API token in the `X-KMD-API-Token` header.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared_types::Address;
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::SEED_LEN;
use crate::error::KeyCustodyError;
use crate::ports::{KeyCustodyClient, WalletHandle, WalletSummary};

/// Header carrying the key-custody API token.
pub const KMD_TOKEN_HEADER: &str = "X-KMD-API-Token";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

// =============================================================================
// WIRE RECORDS
// =============================================================================

#[derive(Deserialize)]
struct VersionsResponse {
    #[serde(default)]
    versions: Vec<String>,
}

#[derive(Deserialize)]
struct WalletRecord {
    id: String,
    name: String,
}

#[derive(Deserialize)]
struct ListWalletsResponse {
    #[serde(default)]
    wallets: Vec<WalletRecord>,
}

#[derive(Serialize)]
struct InitWalletRequest<'a> {
    wallet_id: &'a str,
    wallet_password: &'a str,
}

#[derive(Deserialize)]
struct InitWalletResponse {
    wallet_handle_token: String,
}

#[derive(Serialize)]
struct ExportKeyRequest<'a> {
    wallet_handle_token: &'a str,
    address: String,
    wallet_password: &'a str,
}

#[derive(Deserialize)]
struct ExportKeyResponse {
    private_key: String,
}

#[derive(Serialize)]
struct GenerateKeyRequest<'a> {
    wallet_handle_token: &'a str,
    display_mnemonic: bool,
}

#[derive(Deserialize)]
struct GenerateKeyResponse {
    address: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: String,
}

// =============================================================================
// CLIENT
// =============================================================================

/// HTTP client for the key-custody service.
pub struct KmdHttpClient {
    client: Client,
    base_url: String,
    token: String,
}

impl KmdHttpClient {
    /// Creates a client for the service at `base_url` (e.g. `http://localhost:7833`).
    ///
    /// # Errors
    ///
    /// [`KeyCustodyError::Connection`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, KeyCustodyError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| KeyCustodyError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<R: DeserializeOwned>(&self, request: RequestBuilder) -> Result<R, KeyCustodyError> {
        let response = request
            .header(KMD_TOKEN_HEADER, &self.token)
            .send()
            .await
            .map_err(|e| KeyCustodyError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|e| e.message)
                .unwrap_or_default();
            return Err(KeyCustodyError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<R>()
            .await
            .map_err(|e| KeyCustodyError::Decode(e.to_string()))
    }

    async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, KeyCustodyError> {
        debug!(path, "GET key custody");
        self.send(self.client.get(self.url(path))).await
    }

    async fn post<B: Serialize + Sync, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, KeyCustodyError> {
        debug!(path, "POST key custody");
        self.send(self.client.post(self.url(path)).json(body)).await
    }
}

/// Extracts the seed from a base64 64-byte private key (seed ‖ public key).
fn seed_from_private_key(encoded: &str) -> Result<Zeroizing<[u8; SEED_LEN]>, KeyCustodyError> {
    let decoded = Zeroizing::new(
        BASE64
            .decode(encoded)
            .map_err(|e| KeyCustodyError::Decode(e.to_string()))?,
    );
    if decoded.len() < SEED_LEN {
        return Err(KeyCustodyError::Decode(format!(
            "private key has {} bytes",
            decoded.len()
        )));
    }
    let mut seed = Zeroizing::new([0u8; SEED_LEN]);
    seed.copy_from_slice(&decoded[..SEED_LEN]);
    Ok(seed)
}

#[async_trait]
impl KeyCustodyClient for KmdHttpClient {
    async fn versions(&self) -> Result<Vec<String>, KeyCustodyError> {
        let response: VersionsResponse = self.get("/versions").await?;
        Ok(response.versions)
    }

    async fn list_wallets(&self) -> Result<Vec<WalletSummary>, KeyCustodyError> {
        let response: ListWalletsResponse = self.get("/v1/wallets").await?;
        Ok(response
            .wallets
            .into_iter()
            .map(|w| WalletSummary {
                id: w.id,
                name: w.name,
            })
            .collect())
    }

    async fn init_wallet_handle(
        &self,
        wallet_id: &str,
        password: &str,
    ) -> Result<WalletHandle, KeyCustodyError> {
        let response: InitWalletResponse = self
            .post(
                "/v1/wallet/init",
                &InitWalletRequest {
                    wallet_id,
                    wallet_password: password,
                },
            )
            .await?;
        Ok(WalletHandle::new(response.wallet_handle_token))
    }

    async fn export_key(
        &self,
        handle: &WalletHandle,
        password: &str,
        address: &Address,
    ) -> Result<Zeroizing<[u8; SEED_LEN]>, KeyCustodyError> {
        let response: ExportKeyResponse = self
            .post(
                "/v1/key/export",
                &ExportKeyRequest {
                    wallet_handle_token: handle.as_str(),
                    address: address.encode(),
                    wallet_password: password,
                },
            )
            .await?;
        let private_key = Zeroizing::new(response.private_key);
        seed_from_private_key(&private_key)
    }

    async fn generate_key(&self, handle: &WalletHandle) -> Result<Address, KeyCustodyError> {
        let response: GenerateKeyResponse = self
            .post(
                "/v1/key",
                &GenerateKeyRequest {
                    wallet_handle_token: handle.as_str(),
                    display_mnemonic: false,
                },
            )
            .await?;
        response
            .address
            .parse()
            .map_err(|e: shared_types::AddressError| KeyCustodyError::Decode(e.to_string()))
    }
}
