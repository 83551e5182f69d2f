use anyhow::Result;
use log::info;

use super::pipeline::{BestEffort, Required};
use crate::domain::{CancelOutcome, CancelTarget, OrderFilter};
use crate::execution::ExchangeApi;
use crate::report::print_section;

const OPEN_ORDER_COUNT: BestEffort = BestEffort::new("open order count");
const CANCEL: Required = Required::new("cancel request");

/// Cancels `target` and prints what was and was not removed.
///
/// A partial result is still `Ok`; only a failed request is an error.
pub async fn cancel_orders<E>(exchange: &E, target: &CancelTarget) -> Result<CancelOutcome>
where
    E: ExchangeApi + ?Sized,
{
    let scope = match target {
        CancelTarget::Order(id) => {
            print_section(&format!("CANCEL ORDER {}", id));
            None
        }
        CancelTarget::All => {
            print_section("CANCEL ALL OPEN ORDERS");
            Some(OrderFilter::default())
        }
        CancelTarget::Market(market) => {
            print_section(&format!("CANCEL ORDERS IN MARKET {}", market));
            Some(OrderFilter {
                market: Some(market.clone()),
                asset_id: None,
            })
        }
    };

    if let Some(filter) = scope {
        if let Some(open) = OPEN_ORDER_COUNT.run(exchange.open_orders(&filter)).await {
            info!("📋 {} open order(s) in scope", open.len());
        }
    }

    let outcome = CANCEL.run(exchange.cancel(target)).await?;
    print_outcome(&outcome);
    Ok(outcome)
}

fn print_outcome(outcome: &CancelOutcome) {
    if outcome.is_empty() {
        println!("\nNothing to cancel.");
        return;
    }

    if !outcome.canceled.is_empty() {
        println!("\n✅ Cancelled ({}):", outcome.canceled.len());
        for id in &outcome.canceled {
            println!("   {}", id);
        }
    }

    if !outcome.not_canceled.is_empty() {
        println!("\n⚠️  Not cancelled ({}):", outcome.not_canceled.len());
        for (id, reason) in &outcome.not_canceled {
            println!("   {}: {}", id, reason);
        }
    }

    if outcome.is_partial() {
        println!("\nPartial cancel: the orders above were left on the book.");
    }
}
