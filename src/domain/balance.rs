use ethers::types::U256;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::constants::{RECOMMENDED_GAS_BALANCE, RECOMMENDED_USDC_BALANCE};

/// Raw on-chain integer scaled down by `decimals`.
///
/// Amounts too large for a `Decimal` (an unlimited allowance, say) saturate
/// to `Decimal::MAX`.
pub fn to_decimal(raw: U256, decimals: u32) -> Decimal {
    match u128::try_from(raw) {
        Ok(value) if value <= i128::MAX as u128 => {
            Decimal::try_from_i128_with_scale(value as i128, decimals).unwrap_or(Decimal::MAX)
        }
        _ => Decimal::MAX,
    }
}

/// Same as [`to_decimal`] for the base-10 strings the exchange returns.
pub fn parse_scaled(raw: &str, decimals: u32) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    U256::from_dec_str(raw)
        .ok()
        .map(|value| to_decimal(value, decimals))
}

/// Whole-unit amount to base units, truncating extra precision.
pub fn to_base_units(amount: Decimal, decimals: u32) -> Option<u64> {
    let scaled = amount.checked_mul(Decimal::from(10u64.pow(decimals)))?;
    scaled.trunc().to_u64()
}

/// Balance and, where tracked, allowance of one asset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceSnapshot {
    pub balance: Decimal,
    pub allowance: Option<Decimal>,
}

impl BalanceSnapshot {
    pub fn covers(&self, required: Decimal) -> bool {
        self.balance >= required
    }

    /// True when the exchange may spend less than the wallet holds.
    pub fn allowance_short(&self) -> bool {
        matches!(self.allowance, Some(allowance) if allowance < self.balance)
    }
}

/// `/balance-allowance` reply. Older deployments return a single
/// `allowance`, newer ones a map keyed by spender.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceAllowanceResponse {
    pub balance: String,
    #[serde(default)]
    pub allowance: Option<String>,
    #[serde(default)]
    pub allowances: Option<std::collections::BTreeMap<String, String>>,
}

impl BalanceAllowanceResponse {
    pub fn into_snapshot(self, decimals: u32) -> Option<BalanceSnapshot> {
        let balance = parse_scaled(&self.balance, decimals)?;
        let allowance = match (self.allowance, self.allowances) {
            (Some(single), _) => parse_scaled(&single, decimals),
            (None, Some(map)) => map
                .values()
                .filter_map(|raw| parse_scaled(raw, decimals))
                .min(),
            (None, None) => None,
        };
        Some(BalanceSnapshot { balance, allowance })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasStatus {
    Sufficient,
    Low,
}

impl GasStatus {
    pub fn classify(balance: Decimal) -> Self {
        if balance > RECOMMENDED_GAS_BALANCE {
            GasStatus::Sufficient
        } else {
            GasStatus::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollateralStatus {
    Empty,
    BelowRecommended,
    Sufficient,
}

impl CollateralStatus {
    pub fn classify(balance: Decimal) -> Self {
        if balance.is_zero() {
            CollateralStatus::Empty
        } else if balance < RECOMMENDED_USDC_BALANCE {
            CollateralStatus::BelowRecommended
        } else {
            CollateralStatus::Sufficient
        }
    }
}

/// Result of looking for bridged funds on Polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingStatus {
    Landed,
    Pending,
}

impl LandingStatus {
    pub fn classify(balance: Decimal) -> Self {
        if balance > Decimal::ZERO {
            LandingStatus::Landed
        } else {
            LandingStatus::Pending
        }
    }
}
