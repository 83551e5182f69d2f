use anyhow::Result;

use super::order_placement::ScoringStatus;
use super::pipeline::{BestEffort, Required};
use crate::domain::time::format_local;
use crate::domain::{OpenOrder, OrderCounts, OrderFilter};
use crate::execution::ExchangeApi;
use crate::report::{cents, divider, print_section};

const FETCH_ORDERS: Required = Required::new("open order fetch");
const ORDER_SCORING: BestEffort = BestEffort::new("order scoring check");

#[derive(Debug, Clone)]
pub struct ListedOrder {
    pub order: OpenOrder,
    pub scoring: ScoringStatus,
}

#[derive(Debug, Clone)]
pub struct OrderListing {
    pub orders: Vec<ListedOrder>,
    pub counts: OrderCounts,
}

/// Every open order matching `filter`, each with its own scoring lookup.
pub async fn list_orders<E>(exchange: &E, filter: &OrderFilter) -> Result<OrderListing>
where
    E: ExchangeApi + ?Sized,
{
    print_section("OPEN ORDERS");
    if let Some(market) = &filter.market {
        println!("Market filter: {}", market);
    }
    if let Some(token) = &filter.asset_id {
        println!("Token filter:  {}", token);
    }

    let open = FETCH_ORDERS.run(exchange.open_orders(filter)).await?;
    let counts = OrderCounts::tally(&open);

    if open.is_empty() {
        println!("\nNo open orders.");
    }

    let mut orders = Vec::with_capacity(open.len());
    for (i, order) in open.into_iter().enumerate() {
        let checked = ORDER_SCORING.run(exchange.is_order_scoring(&order.id)).await;
        let scoring = ScoringStatus::from_check(checked);
        print_order(i + 1, &order, scoring);
        orders.push(ListedOrder { order, scoring });
    }

    println!("\n{}", divider());
    println!(
        "Total: {}  |  Buy: {}  |  Sell: {}",
        counts.total, counts.buys, counts.sells
    );

    Ok(OrderListing { orders, counts })
}

fn print_order(num: usize, order: &OpenOrder, scoring: ScoringStatus) {
    println!("\n#{} {}", num, order.id);
    println!(
        "   {} {} @ {}  [{}]",
        order.side,
        order.original_size,
        cents(order.price),
        order.time_in_force()
    );
    if let Some(outcome) = &order.outcome {
        println!("   Outcome:  {}", outcome);
    }
    println!("   Market:   {}", order.market);
    println!("   Token:    {}", order.asset_id);
    println!(
        "   Matched:  {} / {} ({}%)",
        order.size_matched,
        order.original_size,
        order.percent_matched()
    );
    println!("   Status:   {}", order.status);
    println!(
        "   Created:  {}",
        order
            .created()
            .map(format_local)
            .unwrap_or_else(|| "unknown".to_string())
    );
    println!(
        "   Expires:  {}",
        order
            .expires()
            .map(format_local)
            .unwrap_or_else(|| "never".to_string())
    );
    println!("   Rewards:  {}", scoring.label());
}
