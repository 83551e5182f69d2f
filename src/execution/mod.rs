pub mod auth;
pub mod clob_client;
pub mod errors;
pub mod order_builder;
pub mod orderbook;

pub use clob_client::ClobClient;
pub use errors::ClobError;

use async_trait::async_trait;
use ethers::types::Address;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::domain::{
    ApiCredentials, AssetType, BalanceSnapshot, CancelOutcome, CancelTarget, OpenOrder, OrderFilter,
    OrderRequest, OrderResponse, Quote,
};

/// Exchange operations the trading workflows depend on.
#[async_trait]
pub trait ExchangeApi: Send + Sync {
    /// Signer address the session authenticates as.
    fn address(&self) -> Address;

    async fn balance_allowance(&self, asset: &AssetType) -> Result<BalanceSnapshot, ClobError>;

    async fn quote(&self, token_id: &str) -> Result<Quote, ClobError>;

    /// Builds, signs and submits `request`. Market orders go in as FOK,
    /// limit orders as GTC.
    async fn place_order(&self, request: &OrderRequest) -> Result<OrderResponse, ClobError>;

    async fn is_order_scoring(&self, order_id: &str) -> Result<bool, ClobError>;

    async fn cancel(&self, target: &CancelTarget) -> Result<CancelOutcome, ClobError>;

    /// Every open order matching `filter`, across all pages.
    async fn open_orders(&self, filter: &OrderFilter) -> Result<Vec<OpenOrder>, ClobError>;
}

/// Credential endpoints used by the bootstrap workflow.
#[async_trait]
pub trait CredentialApi: Send + Sync {
    fn address(&self) -> Address;

    /// Whether L2 credentials were configured for this session.
    fn has_credentials(&self) -> bool;

    async fn create_or_derive_api_key(&self) -> Result<ApiCredentials, ClobError>;

    /// Read-only call that succeeds only with valid L2 credentials.
    async fn api_keys(&self) -> Result<serde_json::Value, ClobError>;
}

/// Sends `request` and decodes a JSON body, turning non-2xx replies into
/// [`ClobError::Api`] with the body kept for the operator.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    path: &str,
) -> Result<T, ClobError> {
    let transport = |source| ClobError::Transport {
        path: path.to_string(),
        source,
    };

    let resp = request.send().await.map_err(transport)?;
    let status = resp.status();
    let body = resp.text().await.map_err(transport)?;

    if !status.is_success() {
        return Err(ClobError::Api {
            path: path.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|e| ClobError::Decode {
        path: path.to_string(),
        reason: e.to_string(),
    })
}
