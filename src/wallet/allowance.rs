use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use ethers::abi::Detokenize;
use ethers::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;

use super::balance::fetch_gas_balance;
use crate::config::ContractAddresses;
use crate::constants::{
    APPROVAL_CONFIRMATIONS, APPROVAL_GAS_LIMIT, BASE_FEE_MULTIPLIER, FALLBACK_BASE_FEE_GWEI, GWEI,
    PRIORITY_FEE_GWEI,
};
use crate::domain::{AllowanceSet, ApprovalStep, ApprovalToken, Spender};

// ===============================
// FEE BID
// ===============================

/// Gas pricing computed once and reused for every approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeBid {
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
    pub gas_limit: U256,
}

impl FeeBid {
    /// `base × 2 + priority`, with a fixed base when the node reports none.
    pub fn from_base_fee(base_fee: Option<U256>) -> Self {
        let gwei = U256::from(GWEI);
        let base = base_fee.unwrap_or_else(|| U256::from(FALLBACK_BASE_FEE_GWEI) * gwei);
        let priority = U256::from(PRIORITY_FEE_GWEI) * gwei;
        Self {
            max_fee_per_gas: base * U256::from(BASE_FEE_MULTIPLIER) + priority,
            max_priority_fee_per_gas: priority,
            gas_limit: U256::from(APPROVAL_GAS_LIMIT),
        }
    }

    pub fn max_fee_gwei(&self) -> U256 {
        self.max_fee_per_gas / U256::from(GWEI)
    }
}

// ===============================
// GATEWAY
// ===============================

/// Chain access needed to inspect and grant trading approvals.
#[async_trait]
pub trait AllowanceGateway: Send + Sync {
    fn owner(&self) -> Address;

    async fn gas_balance(&self) -> Result<Decimal>;

    async fn usdc_allowance(&self, spender: Spender) -> Result<U256>;

    async fn ctf_approved(&self, operator: Spender) -> Result<bool>;

    async fn fee_bid(&self) -> Result<FeeBid>;

    /// Sends the approval for `step` and returns its hash without waiting.
    async fn broadcast(&self, step: ApprovalStep, fee: &FeeBid) -> Result<TxHash>;

    /// Waits until `tx` is mined and fails if it reverted.
    async fn confirm(&self, tx: TxHash) -> Result<()>;
}

/// Read-only snapshot of all five approvals.
pub async fn check_allowances<G: AllowanceGateway + ?Sized>(gateway: &G) -> Result<AllowanceSet> {
    Ok(AllowanceSet {
        usdc_exchange: gateway.usdc_allowance(Spender::Exchange).await?,
        usdc_neg_risk_adapter: gateway.usdc_allowance(Spender::NegRiskAdapter).await?,
        usdc_neg_risk_exchange: gateway.usdc_allowance(Spender::NegRiskExchange).await?,
        ctf_exchange: gateway.ctf_approved(Spender::Exchange).await?,
        ctf_neg_risk_exchange: gateway.ctf_approved(Spender::NegRiskExchange).await?,
    })
}

pub fn spender_address(contracts: &ContractAddresses, spender: Spender) -> Address {
    match spender {
        Spender::Exchange => contracts.exchange,
        Spender::NegRiskAdapter => contracts.neg_risk_adapter,
        Spender::NegRiskExchange => contracts.neg_risk_exchange,
    }
}

// ===============================
// ETHERS IMPLEMENTATION
// ===============================

abigen!(
    UsdcContract,
    r#"[
        function allowance(address owner, address spender) view returns (uint256)
        function approve(address spender, uint256 amount) returns (bool)
    ]"#
);

abigen!(
    CtfContract,
    r#"[
        function isApprovedForAll(address owner, address operator) view returns (bool)
        function setApprovalForAll(address operator, bool approved)
    ]"#
);

type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

pub struct ChainAllowances {
    client: Arc<SignerClient>,
    contracts: ContractAddresses,
}

impl ChainAllowances {
    pub fn new(provider: Provider<Http>, wallet: LocalWallet, contracts: ContractAddresses) -> Self {
        Self {
            client: Arc::new(SignerMiddleware::new(provider, wallet)),
            contracts,
        }
    }

    fn usdc(&self) -> UsdcContract<SignerClient> {
        UsdcContract::new(self.contracts.usdc, self.client.clone())
    }

    fn ctf(&self) -> CtfContract<SignerClient> {
        CtfContract::new(self.contracts.ctf, self.client.clone())
    }
}

async fn send_with_fee<D: Detokenize>(
    mut call: ContractCall<SignerClient, D>,
    fee: &FeeBid,
) -> Result<TxHash> {
    call.tx.set_gas(fee.gas_limit);
    if let Some(tx) = call.tx.as_eip1559_mut() {
        tx.max_fee_per_gas = Some(fee.max_fee_per_gas);
        tx.max_priority_fee_per_gas = Some(fee.max_priority_fee_per_gas);
    }
    let pending = call
        .send()
        .await
        .map_err(|e| anyhow!("broadcast failed: {}", e))?;
    Ok(pending.tx_hash())
}

#[async_trait]
impl AllowanceGateway for ChainAllowances {
    fn owner(&self) -> Address {
        self.client.address()
    }

    async fn gas_balance(&self) -> Result<Decimal> {
        fetch_gas_balance(self.client.as_ref(), self.owner()).await
    }

    async fn usdc_allowance(&self, spender: Spender) -> Result<U256> {
        let spender = spender_address(&self.contracts, spender);
        Ok(self.usdc().allowance(self.owner(), spender).call().await?)
    }

    async fn ctf_approved(&self, operator: Spender) -> Result<bool> {
        let operator = spender_address(&self.contracts, operator);
        Ok(self
            .ctf()
            .is_approved_for_all(self.owner(), operator)
            .call()
            .await?)
    }

    async fn fee_bid(&self) -> Result<FeeBid> {
        let block = self
            .client
            .get_block(BlockNumber::Latest)
            .await
            .map_err(|e| anyhow!("latest block query failed: {}", e))?;
        Ok(FeeBid::from_base_fee(block.and_then(|b| b.base_fee_per_gas)))
    }

    async fn broadcast(&self, step: ApprovalStep, fee: &FeeBid) -> Result<TxHash> {
        let spender = spender_address(&self.contracts, step.spender);
        match step.token {
            ApprovalToken::Usdc => send_with_fee(self.usdc().approve(spender, U256::MAX), fee).await,
            ApprovalToken::Ctf => {
                send_with_fee(self.ctf().set_approval_for_all(spender, true), fee).await
            }
        }
    }

    async fn confirm(&self, tx: TxHash) -> Result<()> {
        let receipt = PendingTransaction::new(tx, self.client.provider())
            .confirmations(APPROVAL_CONFIRMATIONS)
            .await
            .map_err(|e| anyhow!("waiting for {:?} failed: {}", tx, e))?;

        match receipt {
            Some(r) if r.status == Some(U64::from(1)) => Ok(()),
            Some(_) => bail!("transaction {:?} reverted", tx),
            None => bail!("transaction {:?} was dropped before confirmation", tx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubles_base_fee_and_adds_priority() {
        let bid = FeeBid::from_base_fee(Some(U256::from(40u64) * U256::from(GWEI)));
        assert_eq!(bid.max_fee_gwei(), U256::from(130u64));
        assert_eq!(
            bid.max_priority_fee_per_gas,
            U256::from(50u64) * U256::from(GWEI)
        );
        assert_eq!(bid.gas_limit, U256::from(100_000u64));
    }

    #[test]
    fn falls_back_to_thirty_gwei_base() {
        let bid = FeeBid::from_base_fee(None);
        assert_eq!(bid.max_fee_gwei(), U256::from(110u64));
    }

    #[test]
    fn maps_spenders_to_contracts() {
        let contracts = ContractAddresses::polygon(None).unwrap();
        assert_eq!(
            spender_address(&contracts, Spender::NegRiskAdapter),
            contracts.neg_risk_adapter
        );
        assert_eq!(spender_address(&contracts, Spender::Exchange), contracts.exchange);
    }
}
