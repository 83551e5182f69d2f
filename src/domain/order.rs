use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::constants::{
    MAX_ORDER_SIZE, MIN_LIMIT_ORDER_NOTIONAL, MIN_LIMIT_ORDER_SHARES, MIN_MARKET_ORDER_VALUE,
    MIN_TICK_SIZE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Encoding used in the signed EIP-712 order.
    pub fn as_u8(self) -> u8 {
        match self {
            Side::Buy => 0,
            Side::Sell => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OrderKind {
    Market,
    #[default]
    Limit,
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderKind::Market => f.write_str("MARKET"),
            OrderKind::Limit => f.write_str("LIMIT"),
        }
    }
}

/// How long the exchange keeps an order alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimeInForce {
    #[serde(rename = "FOK")]
    FillOrKill,
    #[serde(rename = "GTC")]
    GoodTillCancelled,
}

impl TimeInForce {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeInForce::FillOrKill => "FOK",
            TimeInForce::GoodTillCancelled => "GTC",
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("price must be between 0 and 1 (exclusive), got {0}")]
    PriceOutOfRange(Decimal),

    #[error("minimum order value for MARKET orders: $1.00 (your order value: ${0:.2})")]
    MarketBelowMinimum(Decimal),

    #[error("order size {0} exceeds the maximum of {max}", max = MAX_ORDER_SIZE)]
    SizeTooLarge(Decimal),

    #[error("minimum order size for LIMIT orders: 5 shares (your size: {0} shares)")]
    LimitBelowMinimumShares(Decimal),

    #[error("minimum order value: $0.10 (your order value: ${notional:.2})")]
    LimitBelowMinimumNotional { notional: Decimal },
}

/// One order as the operator asked for it.
///
/// `size` is a dollar amount for market buys and a share count otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub token_id: String,
    pub side: Side,
    pub kind: OrderKind,
    pub price: Decimal,
    pub size: Decimal,
}

impl OrderRequest {
    /// Local checks; run before anything touches the network.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.price < MIN_TICK_SIZE || self.price >= Decimal::ONE {
            return Err(ValidationError::PriceOutOfRange(self.price));
        }
        if self.size > MAX_ORDER_SIZE {
            return Err(ValidationError::SizeTooLarge(self.size));
        }
        let value = self
            .expected_value()
            .ok_or(ValidationError::SizeTooLarge(self.size))?;

        match self.kind {
            OrderKind::Market => {
                if value < MIN_MARKET_ORDER_VALUE {
                    return Err(ValidationError::MarketBelowMinimum(value));
                }
            }
            OrderKind::Limit => {
                if self.size < MIN_LIMIT_ORDER_SHARES {
                    return Err(ValidationError::LimitBelowMinimumShares(self.size));
                }
                if value < MIN_LIMIT_ORDER_NOTIONAL {
                    return Err(ValidationError::LimitBelowMinimumNotional { notional: value });
                }
            }
        }

        Ok(())
    }

    /// `None` only for sizes that `validate` rejects.
    pub fn notional(&self) -> Option<Decimal> {
        self.price.checked_mul(self.size)
    }

    pub fn time_in_force(&self) -> TimeInForce {
        match self.kind {
            OrderKind::Market => TimeInForce::FillOrKill,
            OrderKind::Limit => TimeInForce::GoodTillCancelled,
        }
    }

    /// What the wallet must hold before placing: dollars for a buy, shares
    /// for a sell.
    pub fn required_funds(&self) -> Option<Decimal> {
        match (self.side, self.kind) {
            (Side::Buy, OrderKind::Market) => Some(self.size),
            (Side::Buy, OrderKind::Limit) => self.notional(),
            (Side::Sell, _) => Some(self.size),
        }
    }

    /// Shares that change hands, approximately for market buys.
    pub fn expected_shares(&self) -> Option<Decimal> {
        match (self.side, self.kind) {
            (Side::Buy, OrderKind::Market) => self.size.checked_div(self.price),
            _ => Some(self.size),
        }
    }

    /// Dollars that change hands, approximately for market sells.
    pub fn expected_value(&self) -> Option<Decimal> {
        match (self.side, self.kind) {
            (Side::Buy, OrderKind::Market) => Some(self.size),
            _ => self.notional(),
        }
    }
}

/// Where a limit price sits against the current book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricePosition {
    /// Will likely execute immediately.
    CrossesSpread,
    InsideSpread,
    RestsOnBook,
}

impl PricePosition {
    pub fn classify(side: Side, price: Decimal, bid: Decimal, ask: Decimal) -> Self {
        match side {
            Side::Buy if price >= ask => PricePosition::CrossesSpread,
            Side::Buy if price >= bid => PricePosition::InsideSpread,
            Side::Sell if price <= bid => PricePosition::CrossesSpread,
            Side::Sell if price <= ask => PricePosition::InsideSpread,
            _ => PricePosition::RestsOnBook,
        }
    }
}

/// Exchange reply to an order submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderResponse {
    #[serde(rename = "orderID", default)]
    pub order_id: String,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "errorMsg", default)]
    pub error_msg: Option<String>,
}
