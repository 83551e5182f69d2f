use chrono::{DateTime, Local, TimeZone};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;

use super::order::Side;

/// An order resting on the book, as `/data/orders` reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenOrder {
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub market: String,
    #[serde(default)]
    pub asset_id: String,
    pub side: Side,
    pub price: Decimal,
    pub original_size: Decimal,
    #[serde(default)]
    pub size_matched: Decimal,
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default)]
    pub order_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_epoch")]
    pub created_at: i64,
    #[serde(default, deserialize_with = "deserialize_epoch")]
    pub expiration: i64,
}

// Epoch seconds arrive as either a JSON number or a string
fn deserialize_epoch<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrInt {
        String(String),
        Int(i64),
    }

    match StringOrInt::deserialize(deserializer)? {
        StringOrInt::String(s) if s.is_empty() => Ok(0),
        StringOrInt::String(s) => s.parse::<i64>().map_err(serde::de::Error::custom),
        StringOrInt::Int(i) => Ok(i),
    }
}

impl OpenOrder {
    /// Matched share of the original size, in percent to one decimal place.
    pub fn percent_matched(&self) -> Decimal {
        if self.original_size.is_zero() {
            return Decimal::ZERO;
        }
        (self.size_matched / self.original_size * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    }

    pub fn created(&self) -> Option<DateTime<Local>> {
        local_time(self.created_at)
    }

    /// `None` for orders that never expire.
    pub fn expires(&self) -> Option<DateTime<Local>> {
        local_time(self.expiration)
    }

    pub fn time_in_force(&self) -> &str {
        self.order_type.as_deref().unwrap_or("GTC")
    }
}

fn local_time(epoch_seconds: i64) -> Option<DateTime<Local>> {
    if epoch_seconds <= 0 {
        return None;
    }
    Local.timestamp_opt(epoch_seconds, 0).single()
}

/// One page of `/data/orders`.
#[derive(Debug, Deserialize)]
pub struct OrdersPage {
    #[serde(default)]
    pub data: Vec<OpenOrder>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Narrowing applied when listing open orders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub market: Option<String>,
    pub asset_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderCounts {
    pub total: usize,
    pub buys: usize,
    pub sells: usize,
}

impl OrderCounts {
    pub fn tally(orders: &[OpenOrder]) -> Self {
        let buys = orders.iter().filter(|o| o.side == Side::Buy).count();
        Self {
            total: orders.len(),
            buys,
            sells: orders.len() - buys,
        }
    }
}
