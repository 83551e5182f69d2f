use anyhow::Result;
use log::{info, warn};
use rust_decimal::Decimal;
use std::time::Duration;
use thiserror::Error;

use super::pipeline::{BestEffort, Required};
use crate::constants::SCORING_CHECK_DELAY;
use crate::domain::{
    AssetType, OrderKind, OrderRequest, OrderResponse, PricePosition, Quote, Side,
};
use crate::execution::{ClobError, ExchangeApi};
use crate::logging::{log_rejection, log_success};
use crate::report::{cents, print_section, usd};

const BALANCE_PREFLIGHT: Required = Required::new("balance pre-flight");
const MARKET_QUOTE: BestEffort = BestEffort::new("market quote");
const ORDER_PLACEMENT: Required = Required::new("order placement");
const REWARD_SCORING: BestEffort = BestEffort::new("reward scoring check");

#[derive(Debug, Error, PartialEq)]
pub enum PreflightError {
    #[error("insufficient {asset}: have {available}, need {required}")]
    Insufficient {
        asset: &'static str,
        available: Decimal,
        required: Decimal,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringStatus {
    Scoring,
    NotScoring,
    Unknown,
}

impl ScoringStatus {
    pub fn from_check(result: Option<bool>) -> Self {
        match result {
            Some(true) => ScoringStatus::Scoring,
            Some(false) => ScoringStatus::NotScoring,
            None => ScoringStatus::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoringStatus::Scoring => "✅ scoring for rewards",
            ScoringStatus::NotScoring => "❌ not scoring",
            ScoringStatus::Unknown => "❓ unknown",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlacementOptions {
    /// Pause between a limit order landing and the scoring query.
    pub scoring_delay: Duration,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            scoring_delay: SCORING_CHECK_DELAY,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlacementReport {
    pub response: OrderResponse,
    pub quote: Option<Quote>,
    /// Only set for accepted limit orders.
    pub scoring: Option<ScoringStatus>,
}

/// Validate, pre-flight, quote, place and report one order.
pub async fn place_order<E>(
    exchange: &E,
    request: &OrderRequest,
    options: &PlacementOptions,
) -> Result<PlacementReport>
where
    E: ExchangeApi + ?Sized,
{
    if let Err(e) = request.validate() {
        log_rejection(&e.to_string());
        return Err(e.into());
    }

    print_size_semantics(request);

    // ==================================================
    // PRE-FLIGHT
    // ==================================================
    let (asset, asset_name) = match request.side {
        Side::Buy => (AssetType::Collateral, "USDC"),
        Side::Sell => (AssetType::Conditional(request.token_id.clone()), "shares"),
    };
    let required = request
        .required_funds()
        .ok_or_else(|| anyhow::anyhow!("order size {} is out of range", request.size))?;

    BALANCE_PREFLIGHT
        .run(async {
            let snapshot = exchange.balance_allowance(&asset).await?;
            info!(
                "💰 Available {}: {} (need {})",
                asset_name, snapshot.balance, required
            );
            if snapshot.allowance_short() {
                warn!("⚠️ Exchange allowance is below balance; run setup_allowances if the order is refused");
            }
            if !snapshot.covers(required) {
                return Err(anyhow::Error::from(PreflightError::Insufficient {
                    asset: asset_name,
                    available: snapshot.balance,
                    required,
                }));
            }
            Ok(())
        })
        .await?;

    // ==================================================
    // MARKET CONTEXT
    // ==================================================
    let quote = MARKET_QUOTE.run(exchange.quote(&request.token_id)).await;
    if let Some(q) = &quote {
        print_quote(request, q);
    }

    // ==================================================
    // PLACEMENT
    // ==================================================
    info!(
        "📝 Placing {} {} order ({})...",
        request.kind,
        request.side,
        request.time_in_force().as_str()
    );
    let placed = exchange.place_order(request).await;
    if let Err(e) = &placed {
        print_remote_detail(e);
    }
    let response = ORDER_PLACEMENT.run(async { placed }).await?;
    print_response(&response);

    // ==================================================
    // REWARDS
    // ==================================================
    let scoring = if request.kind == OrderKind::Limit && response.success {
        let checked = if response.order_id.is_empty() {
            warn!("⚠️ Exchange returned no order ID, cannot check reward scoring");
            None
        } else {
            tokio::time::sleep(options.scoring_delay).await;
            REWARD_SCORING
                .run(exchange.is_order_scoring(&response.order_id))
                .await
        };
        let status = ScoringStatus::from_check(checked);
        println!("Reward scoring: {}", status.label());
        Some(status)
    } else {
        None
    };

    Ok(PlacementReport {
        response,
        quote,
        scoring,
    })
}

fn print_size_semantics(request: &OrderRequest) {
    print_section(&format!("{} {} ORDER", request.kind, request.side));
    println!("Token:  {}", request.token_id);
    println!("Price:  {}", cents(request.price));

    match (request.side, request.kind) {
        (Side::Buy, OrderKind::Market) => {
            println!("Size:   {} (dollars to spend)", usd(request.size));
            if let Some(shares) = request.expected_shares() {
                println!(
                    "⚠️  Market buy: spends {} and receives about {:.2} shares",
                    usd(request.size),
                    shares
                );
            }
        }
        (Side::Sell, OrderKind::Market) => {
            println!("Size:   {} shares", request.size);
            if let Some(value) = request.expected_value() {
                println!(
                    "⚠️  Market sell: sells {} shares for about {}",
                    request.size,
                    usd(value)
                );
            }
        }
        (side, OrderKind::Limit) => {
            let verb = if side == Side::Buy { "buys" } else { "sells" };
            println!("Size:   {} shares", request.size);
            if let Some(notional) = request.notional() {
                println!(
                    "⚠️  Limit order: {} exactly {} shares for {}",
                    verb,
                    request.size,
                    usd(notional)
                );
            }
        }
    }
}

fn print_quote(request: &OrderRequest, quote: &Quote) {
    println!("\n📊 Market");
    println!("   Best bid: {}", cents(quote.bid));
    println!("   Best ask: {}", cents(quote.ask));
    println!("   Midpoint: {}", cents(quote.mid));
    println!("   Spread:   {}", cents(quote.spread()));

    if request.kind != OrderKind::Limit {
        return;
    }

    match PricePosition::classify(request.side, request.price, quote.bid, quote.ask) {
        PricePosition::CrossesSpread => {
            println!("   💡 Your price crosses the spread and will likely fill immediately.");
        }
        PricePosition::InsideSpread => {
            println!("   💡 Your price is inside the spread; it improves the book and may earn rewards.");
        }
        PricePosition::RestsOnBook => {
            println!("   💡 Your price rests behind the best quote; it waits for the market to move.");
        }
    }
}

fn print_remote_detail(err: &ClobError) {
    if let Some(detail) = err.remote_detail() {
        println!("\n❌ Exchange rejected the order:");
        for line in detail.lines() {
            println!("   {}", line);
        }
    }
}

fn print_response(response: &OrderResponse) {
    println!("\n📬 Order response");
    println!(
        "   Order ID: {}",
        if response.order_id.is_empty() {
            "N/A"
        } else {
            &response.order_id
        }
    );
    println!("   Success:  {}", response.success);
    println!("   Status:   {}", response.status.as_deref().unwrap_or("N/A"));
    if let Some(msg) = response.error_msg.as_deref().filter(|m| !m.is_empty()) {
        println!("   Error:    {}", msg);
    }
    if response.success {
        log_success("Order accepted");
    }
}
