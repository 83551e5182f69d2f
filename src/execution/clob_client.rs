use async_trait::async_trait;
use ethers::types::Address;
use ethers::utils::to_checksum;
use log::{info, warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use super::auth;
use super::errors::ClobError;
use super::order_builder::{MarketParams, OrderBuilder, SignedOrder};
use super::orderbook;
use super::{send_json, CredentialApi, ExchangeApi};
use crate::config::{Config, ContractAddresses, SignatureType};
use crate::constants::{
    CONDITIONAL_TOKEN_DECIMALS, END_CURSOR, HTTP_TIMEOUT, INITIAL_CURSOR, USDC_DECIMALS,
};
use crate::domain::balance::BalanceAllowanceResponse;
use crate::domain::open_order::OrdersPage;
use crate::domain::time::unix_now;
use crate::domain::{
    ApiCredentials, AssetType, BalanceSnapshot, CancelOutcome, CancelTarget, OpenOrder,
    OrderFilter, OrderRequest, OrderResponse, Quote, TimeInForce,
};
use crate::wallet::signer::WalletSigner;

// ==================================================
// CLIENT (WITH API CREDENTIALS)
// ==================================================

/// Authenticated session against the CLOB REST API for one signer.
#[derive(Clone)]
pub struct ClobClient {
    http: Client,
    host: String,
    builder: OrderBuilder,
    creds: Option<ApiCredentials>,
    signature_type: SignatureType,
    // Checksummed signer address sent in POLY_ADDRESS.
    address: String,
}

#[derive(Deserialize)]
struct ScoringResponse {
    scoring: bool,
}

impl ClobClient {
    pub fn new(
        host: &str,
        signer: WalletSigner,
        creds: Option<ApiCredentials>,
        signature_type: SignatureType,
        funder: Option<Address>,
        contracts: &ContractAddresses,
    ) -> Result<Self, ClobError> {
        let http = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|source| ClobError::Transport {
                path: host.to_string(),
                source,
            })?;

        let address = to_checksum(&signer.address(), None);
        let funder = funder.unwrap_or_else(|| signer.address());
        let builder = OrderBuilder::new(
            signer,
            funder,
            signature_type,
            contracts.exchange,
            contracts.neg_risk_exchange,
        );

        Ok(Self {
            http,
            host: host.trim_end_matches('/').to_string(),
            builder,
            creds,
            signature_type,
            address,
        })
    }

    /// Session for `PRIVATE_KEY`, with L2 credentials when all three are set.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let signer = WalletSigner::polygon(config.private_key()?)?;
        let creds = config.api_credentials().ok();
        Ok(Self::new(
            &config.clob_host,
            signer,
            creds,
            config.signature_type,
            config.proxy_wallet,
            &config.contracts,
        )?)
    }

    pub fn signer_address(&self) -> Address {
        self.builder.signer().address()
    }

    pub fn has_credentials(&self) -> bool {
        self.creds.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.host, path)
    }

    // ==================================================
    // L1: API CREDENTIALS
    // ==================================================

    pub async fn create_api_key(&self, nonce: u64) -> Result<ApiCredentials, ClobError> {
        let path = "/auth/api-key";
        let headers = auth::l1_headers(self.builder.signer(), unix_now(), nonce).await?;
        send_json(self.http.post(self.url(path)).headers(headers), path).await
    }

    pub async fn derive_api_key(&self, nonce: u64) -> Result<ApiCredentials, ClobError> {
        let path = "/auth/derive-api-key";
        let headers = auth::l1_headers(self.builder.signer(), unix_now(), nonce).await?;
        send_json(self.http.get(self.url(path)).headers(headers), path).await
    }

    /// Creates a key, falling back to deriving the existing one when the
    /// wallet already has credentials.
    pub async fn create_or_derive_api_key(&self) -> Result<ApiCredentials, ClobError> {
        match self.create_api_key(0).await {
            Ok(creds) if !creds.api_key.is_empty() => Ok(creds),
            Ok(_) => self.derive_api_key(0).await,
            Err(e) => {
                info!("🔑 Create failed ({}), deriving existing API key", e);
                self.derive_api_key(0).await
            }
        }
    }

    // ==================================================
    // L2: AUTHENTICATED REQUESTS
    // ==================================================

    async fn l2_request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<String>,
    ) -> Result<T, ClobError> {
        let creds = self.creds.as_ref().ok_or(ClobError::MissingCredentials)?;
        let headers = auth::l2_headers(
            &self.address,
            creds,
            unix_now(),
            method.as_str(),
            path,
            body.as_deref(),
        )?;

        let mut request = self
            .http
            .request(method, self.url(path))
            .headers(headers)
            .query(query);
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        send_json(request, path).await
    }

    /// Read-only listing of the keys bound to this wallet.
    pub async fn get_api_keys(&self) -> Result<Value, ClobError> {
        self.l2_request(Method::GET, "/auth/api-keys", &[], None).await
    }

    pub async fn get_balance_allowance(
        &self,
        asset: &AssetType,
    ) -> Result<BalanceSnapshot, ClobError> {
        let path = "/balance-allowance";
        let signature_type = self.signature_type.as_u8().to_string();
        let mut query = vec![("signature_type", signature_type.as_str())];
        let decimals = match asset {
            AssetType::Collateral => {
                query.push(("asset_type", "COLLATERAL"));
                USDC_DECIMALS
            }
            AssetType::Conditional(token_id) => {
                query.push(("asset_type", "CONDITIONAL"));
                query.push(("token_id", token_id.as_str()));
                CONDITIONAL_TOKEN_DECIMALS
            }
        };

        let resp: BalanceAllowanceResponse =
            self.l2_request(Method::GET, path, &query, None).await?;
        let raw = resp.balance.clone();
        resp.into_snapshot(decimals).ok_or_else(|| ClobError::Decode {
            path: path.to_string(),
            reason: format!("unreadable balance {:?}", raw),
        })
    }

    pub async fn market_params(&self, token_id: &str) -> Result<MarketParams, ClobError> {
        let (tick_size, neg_risk) = tokio::try_join!(
            orderbook::fetch_tick_size(&self.http, &self.host, token_id),
            orderbook::fetch_neg_risk(&self.http, &self.host, token_id),
        )?;
        Ok(MarketParams {
            tick_size,
            neg_risk,
        })
    }

    pub async fn post_order(
        &self,
        signed: &SignedOrder,
        order_type: TimeInForce,
    ) -> Result<OrderResponse, ClobError> {
        let creds = self.creds.as_ref().ok_or(ClobError::MissingCredentials)?;
        let body = signed.to_body(&creds.api_key, order_type)?;

        info!("📤 Submitting {} order to CLOB API...", order_type.as_str());
        let resp: OrderResponse = self
            .l2_request(Method::POST, "/order", &[], Some(body))
            .await?;

        if !resp.success {
            warn!(
                "⚠️ Exchange did not accept the order: {}",
                resp.error_msg.as_deref().unwrap_or("no reason given")
            );
        }
        Ok(resp)
    }

    pub async fn cancel_order(&self, order_id: &str) -> Result<CancelOutcome, ClobError> {
        let body = json!({ "orderID": order_id }).to_string();
        self.l2_request(Method::DELETE, "/order", &[], Some(body))
            .await
    }

    pub async fn cancel_all(&self) -> Result<CancelOutcome, ClobError> {
        self.l2_request(Method::DELETE, "/cancel-all", &[], None)
            .await
    }

    pub async fn cancel_market_orders(&self, market: &str) -> Result<CancelOutcome, ClobError> {
        let body = json!({ "market": market, "asset_id": "" }).to_string();
        self.l2_request(Method::DELETE, "/cancel-market-orders", &[], Some(body))
            .await
    }

    pub async fn get_open_orders(&self, filter: &OrderFilter) -> Result<Vec<OpenOrder>, ClobError> {
        let mut orders = Vec::new();
        let mut cursor = INITIAL_CURSOR.to_string();

        loop {
            let page: OrdersPage = {
                let mut query = vec![("next_cursor", cursor.as_str())];
                if let Some(market) = &filter.market {
                    query.push(("market", market.as_str()));
                }
                if let Some(asset_id) = &filter.asset_id {
                    query.push(("asset_id", asset_id.as_str()));
                }
                self.l2_request(Method::GET, "/data/orders", &query, None)
                    .await?
            };

            orders.extend(page.data);
            match page.next_cursor {
                Some(next) if !next.is_empty() && next != END_CURSOR && next != cursor => {
                    cursor = next
                }
                _ => break,
            }
        }

        Ok(orders)
    }
}

#[async_trait]
impl CredentialApi for ClobClient {
    fn address(&self) -> Address {
        self.signer_address()
    }

    fn has_credentials(&self) -> bool {
        self.creds.is_some()
    }

    async fn create_or_derive_api_key(&self) -> Result<ApiCredentials, ClobError> {
        ClobClient::create_or_derive_api_key(self).await
    }

    async fn api_keys(&self) -> Result<Value, ClobError> {
        self.get_api_keys().await
    }
}

#[async_trait]
impl ExchangeApi for ClobClient {
    fn address(&self) -> Address {
        self.signer_address()
    }

    async fn balance_allowance(&self, asset: &AssetType) -> Result<BalanceSnapshot, ClobError> {
        self.get_balance_allowance(asset).await
    }

    async fn quote(&self, token_id: &str) -> Result<Quote, ClobError> {
        orderbook::fetch_quote(&self.http, &self.host, token_id).await
    }

    async fn place_order(&self, request: &OrderRequest) -> Result<OrderResponse, ClobError> {
        let params = self.market_params(&request.token_id).await?;
        if params.neg_risk {
            info!("🔀 Neg-risk market, signing against the neg-risk exchange");
        }
        let signed = self.builder.build(request, &params).await?;
        self.post_order(&signed, request.time_in_force()).await
    }

    async fn is_order_scoring(&self, order_id: &str) -> Result<bool, ClobError> {
        let resp: ScoringResponse = self
            .l2_request(Method::GET, "/order-scoring", &[("order_id", order_id)], None)
            .await?;
        Ok(resp.scoring)
    }

    async fn cancel(&self, target: &CancelTarget) -> Result<CancelOutcome, ClobError> {
        match target {
            CancelTarget::Order(id) => self.cancel_order(id).await,
            CancelTarget::All => self.cancel_all().await,
            CancelTarget::Market(market) => self.cancel_market_orders(market).await,
        }
    }

    async fn open_orders(&self, filter: &OrderFilter) -> Result<Vec<OpenOrder>, ClobError> {
        self.get_open_orders(filter).await
    }
}
