use ethers::types::{Address, U256};
use ethers::utils::to_checksum;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;

use super::errors::ClobError;
use crate::config::SignatureType;
use crate::constants::USDC_DECIMALS;
use crate::domain::{OrderKind, OrderRequest, Side, TimeInForce};
use crate::wallet::signer::{ClobOrder, WalletSigner};

/// Per-token trading parameters fetched from the exchange before signing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketParams {
    pub tick_size: Decimal,
    pub neg_risk: bool,
}

/// Decimal places allowed for price, size and notional at one tick size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundConfig {
    pub price: u32,
    pub size: u32,
    pub amount: u32,
}

impl RoundConfig {
    pub fn for_tick(tick: Decimal) -> Result<Self, ClobError> {
        let (price, amount) = match tick.normalize() {
            t if t == dec!(0.1) => (1, 3),
            t if t == dec!(0.01) => (2, 4),
            t if t == dec!(0.001) => (3, 5),
            t if t == dec!(0.0001) => (4, 6),
            other => {
                return Err(ClobError::InvalidOrder(format!(
                    "unsupported tick size {}",
                    other
                )))
            }
        };
        Ok(Self {
            price,
            size: 2,
            amount,
        })
    }
}

/// Maker and taker amounts in base units (6 decimals for both legs).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderAmounts {
    pub maker: U256,
    pub taker: U256,
}

pub fn validate_price(price: Decimal, tick: Decimal) -> Result<(), ClobError> {
    let max = Decimal::ONE - tick;
    if price < tick || price > max {
        return Err(ClobError::InvalidPrice { price, tick, max });
    }
    Ok(())
}

/// Limit prices are signed as given, so they must already sit on a tick.
pub fn validate_tick(price: Decimal, tick: Decimal) -> Result<(), ClobError> {
    match price.checked_rem(tick) {
        Some(rem) if rem.is_zero() => Ok(()),
        _ => Err(ClobError::OffTickPrice { price, tick }),
    }
}

/// Maker/taker amounts for `request`.
///
/// Limit orders: `size` is shares. Market buys: `size` is dollars to spend.
/// Market sells: `size` is shares to sell.
pub fn order_amounts(request: &OrderRequest, tick: Decimal) -> Result<OrderAmounts, ClobError> {
    let cfg = RoundConfig::for_tick(tick)?;

    let (maker, taker) = match request.kind {
        OrderKind::Limit => {
            let price = round_normal(request.price, cfg.price);
            match request.side {
                Side::Buy => {
                    let taker = round_down(request.size, cfg.size);
                    (fit_amount(taker * price, cfg.amount), taker)
                }
                Side::Sell => {
                    let maker = round_down(request.size, cfg.size);
                    (maker, fit_amount(maker * price, cfg.amount))
                }
            }
        }
        OrderKind::Market => {
            let price = round_down(request.price, cfg.price);
            if price.is_zero() {
                return Err(ClobError::InvalidOrder("market price rounds to zero".into()));
            }
            let maker = round_down(request.size, cfg.size);
            match request.side {
                Side::Buy => (maker, fit_amount(maker / price, cfg.amount)),
                Side::Sell => (maker, fit_amount(maker * price, cfg.amount)),
            }
        }
    };

    Ok(OrderAmounts {
        maker: to_base_units(maker)?,
        taker: to_base_units(taker)?,
    })
}

fn round_down(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::ToZero)
}

fn round_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::AwayFromZero)
}

fn round_normal(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

fn decimal_places(value: Decimal) -> u32 {
    value.normalize().scale()
}

// Nudge up at extra precision first so 0.29999999 becomes 0.3, then truncate.
fn fit_amount(value: Decimal, dp: u32) -> Decimal {
    if decimal_places(value) <= dp {
        return value;
    }
    let nudged = round_up(value, dp + 4);
    if decimal_places(nudged) > dp {
        round_down(nudged, dp)
    } else {
        nudged
    }
}

fn to_base_units(value: Decimal) -> Result<U256, ClobError> {
    value
        .checked_mul(Decimal::from(10u64.pow(USDC_DECIMALS)))
        .and_then(|scaled| scaled.trunc().to_u128())
        .map(U256::from)
        .ok_or_else(|| ClobError::InvalidOrder(format!("amount {} out of range", value)))
}

// ==================================================
// SIGNED ORDER
// ==================================================

#[derive(Debug, Clone)]
pub struct SignedOrder {
    pub order: ClobOrder,
    pub signature: String,
}

#[derive(Serialize, Debug)]
struct OrderPayload {
    salt: u64,
    maker: String,
    signer: String,
    taker: String,
    #[serde(rename = "tokenId")]
    token_id: String,
    #[serde(rename = "makerAmount")]
    maker_amount: String,
    #[serde(rename = "takerAmount")]
    taker_amount: String,
    expiration: String,
    nonce: String,
    #[serde(rename = "feeRateBps")]
    fee_rate_bps: String,
    side: &'static str,
    #[serde(rename = "signatureType")]
    signature_type: u8,
    signature: String,
}

#[derive(Serialize, Debug)]
struct PostOrderBody<'a> {
    order: OrderPayload,
    owner: &'a str,
    #[serde(rename = "orderType")]
    order_type: TimeInForce,
}

impl SignedOrder {
    /// JSON body for `POST /order`; `owner` is the API key.
    pub fn to_body(&self, owner: &str, order_type: TimeInForce) -> Result<String, ClobError> {
        let o = &self.order;
        let body = PostOrderBody {
            order: OrderPayload {
                salt: o.salt.low_u64(),
                maker: to_checksum(&o.maker, None),
                signer: to_checksum(&o.signer, None),
                taker: to_checksum(&o.taker, None),
                token_id: o.token_id.to_string(),
                maker_amount: o.maker_amount.to_string(),
                taker_amount: o.taker_amount.to_string(),
                expiration: o.expiration.to_string(),
                nonce: o.nonce.to_string(),
                fee_rate_bps: o.fee_rate_bps.to_string(),
                side: if o.side == 0 { "BUY" } else { "SELL" },
                signature_type: o.signature_type,
                signature: self.signature.clone(),
            },
            owner,
            order_type,
        };
        serde_json::to_string(&body).map_err(|e| ClobError::InvalidOrder(e.to_string()))
    }
}

/// Turns validated requests into exchange-signed orders.
#[derive(Debug, Clone)]
pub struct OrderBuilder {
    signer: WalletSigner,
    funder: Address,
    signature_type: SignatureType,
    exchange: Address,
    neg_risk_exchange: Address,
}

impl OrderBuilder {
    pub fn new(
        signer: WalletSigner,
        funder: Address,
        signature_type: SignatureType,
        exchange: Address,
        neg_risk_exchange: Address,
    ) -> Self {
        Self {
            signer,
            funder,
            signature_type,
            exchange,
            neg_risk_exchange,
        }
    }

    pub fn signer(&self) -> &WalletSigner {
        &self.signer
    }

    pub fn verifying_contract(&self, neg_risk: bool) -> Address {
        if neg_risk {
            self.neg_risk_exchange
        } else {
            self.exchange
        }
    }

    pub fn unsigned(
        &self,
        request: &OrderRequest,
        params: &MarketParams,
        salt: u64,
    ) -> Result<ClobOrder, ClobError> {
        validate_price(request.price, params.tick_size)?;
        if request.kind == OrderKind::Limit {
            validate_tick(request.price, params.tick_size)?;
        }
        let amounts = order_amounts(request, params.tick_size)?;
        let token_id = U256::from_dec_str(&request.token_id)
            .map_err(|e| ClobError::InvalidOrder(format!("token id: {}", e)))?;

        Ok(ClobOrder {
            salt: U256::from(salt),
            maker: self.funder,
            signer: self.signer.address(),
            taker: Address::zero(),
            token_id,
            maker_amount: amounts.maker,
            taker_amount: amounts.taker,
            expiration: U256::zero(),
            nonce: U256::zero(),
            fee_rate_bps: U256::zero(),
            side: request.side.as_u8(),
            signature_type: self.signature_type.as_u8(),
        })
    }

    pub async fn build(
        &self,
        request: &OrderRequest,
        params: &MarketParams,
    ) -> Result<SignedOrder, ClobError> {
        // Salts travel as JSON numbers, so stay within 2^53.
        let salt = rand::random::<u64>() & ((1u64 << 53) - 1);
        let order = self.unsigned(request, params, salt)?;
        let signature = self
            .signer
            .sign_order(&order, self.verifying_contract(params.neg_risk))
            .await
            .map_err(|e| ClobError::Signing(e.to_string()))?;
        Ok(SignedOrder { order, signature })
    }
}
