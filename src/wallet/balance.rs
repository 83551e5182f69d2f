use anyhow::{anyhow, Result};
use async_trait::async_trait;
use ethers::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::constants::POL_DECIMALS;
use crate::domain::balance::to_decimal;

// ================================
// ERC-20 ABI (read side)
// ================================
abigen!(
    Erc20Contract,
    r#"[
        function balanceOf(address owner) view returns (uint256)
        function decimals() view returns (uint8)
        function symbol() view returns (string)
    ]"#
);

#[derive(Debug, Clone, PartialEq)]
pub struct TokenBalance {
    pub raw: U256,
    pub decimals: u8,
    pub symbol: String,
    pub amount: Decimal,
}

pub fn polygon_provider(rpc_url: &str) -> Result<Arc<Provider<Http>>> {
    let provider = Provider::<Http>::try_from(rpc_url).map_err(|e| anyhow!("RPC error: {}", e))?;
    Ok(Arc::new(provider))
}

/// Native POL/MATIC balance in whole units.
pub async fn fetch_gas_balance<M: Middleware + 'static>(client: &M, owner: Address) -> Result<Decimal> {
    let wei = client
        .get_balance(owner, None)
        .await
        .map_err(|e| anyhow!("gas balance query failed: {}", e))?;
    Ok(to_decimal(wei, POL_DECIMALS))
}

/// Balance, decimals and symbol of an ERC-20, read concurrently.
pub async fn fetch_token_balance<M: Middleware + 'static>(
    client: Arc<M>,
    token: Address,
    owner: Address,
) -> Result<TokenBalance> {
    let erc20 = Erc20Contract::new(token, client);
    let balance_call = erc20.balance_of(owner);
    let decimals_call = erc20.decimals();
    let symbol_call = erc20.symbol();

    let (raw, decimals, symbol) = tokio::try_join!(
        balance_call.call(),
        decimals_call.call(),
        symbol_call.call(),
    )?;

    Ok(TokenBalance {
        raw,
        decimals,
        symbol,
        amount: to_decimal(raw, decimals as u32),
    })
}

/// On-chain reads the balance tools need, behind a seam for tests.
#[async_trait]
pub trait WalletReader: Send + Sync {
    fn owner(&self) -> Address;

    async fn gas_balance(&self) -> Result<Decimal>;

    async fn usdc_balance(&self) -> Result<TokenBalance>;
}

pub struct PolygonWallet {
    provider: Arc<Provider<Http>>,
    owner: Address,
    usdc: Address,
}

impl PolygonWallet {
    pub fn new(provider: Arc<Provider<Http>>, owner: Address, usdc: Address) -> Self {
        Self {
            provider,
            owner,
            usdc,
        }
    }
}

#[async_trait]
impl WalletReader for PolygonWallet {
    fn owner(&self) -> Address {
        self.owner
    }

    async fn gas_balance(&self) -> Result<Decimal> {
        fetch_gas_balance(self.provider.as_ref(), self.owner).await
    }

    async fn usdc_balance(&self) -> Result<TokenBalance> {
        fetch_token_balance(self.provider.clone(), self.usdc, self.owner).await
    }
}
