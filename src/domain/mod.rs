pub mod allowance;
pub mod balance;
pub mod cancel;
pub mod credentials;
pub mod open_order;
pub mod order;
pub mod time;

pub use allowance::{AllowanceSet, ApprovalStep, ApprovalToken, Spender, GRANT_SEQUENCE};
pub use balance::{BalanceSnapshot, CollateralStatus, GasStatus, LandingStatus};
pub use cancel::{CancelOutcome, CancelTarget};
pub use credentials::ApiCredentials;
pub use open_order::{OpenOrder, OrderCounts, OrderFilter};
pub use order::{OrderKind, OrderRequest, OrderResponse, PricePosition, Side, TimeInForce};

// ==================================================
// PRICES
// ==================================================

use rust_decimal::Decimal;

/// Best bid, best ask and midpoint of one token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub bid: Decimal,
    pub ask: Decimal,
    pub mid: Decimal,
}

impl Quote {
    pub fn spread(&self) -> Decimal {
        self.ask - self.bid
    }
}

/// Asset whose exchange-tracked balance is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetType {
    Collateral,
    Conditional(String),
}
