//! Command schemas, one per tool, and the routine every tool parses with.

use clap::{ArgGroup, Args, Parser};
use rust_decimal::Decimal;
use std::ffi::OsString;

use crate::constants::{
    BRIDGE_DEPOSIT_ADDRESS, BRIDGE_POLL_INTERVAL, BRIDGE_POLL_TIMEOUT, DEFAULT_BRIDGE_AMOUNT,
};
use crate::domain::{CancelTarget, OrderFilter, OrderKind, OrderRequest, Side};

/// Parses `args` (program name first) against `T`.
pub fn parse_args<T, I, S>(args: I) -> Result<T, clap::Error>
where
    T: Parser,
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    T::try_parse_from(args)
}

/// Parses the process arguments; prints usage and exits nonzero on error.
pub fn parse_or_exit<T: Parser>() -> T {
    match parse_args(std::env::args_os()) {
        Ok(parsed) => parsed,
        Err(e) => e.exit(),
    }
}

/* =======================
ORDERS
======================= */

#[derive(Args, Debug, Clone, PartialEq)]
pub struct OrderArgs {
    /// Outcome token id
    #[arg(long = "token")]
    pub token_id: String,

    /// Price per share between 0 and 1
    #[arg(long)]
    pub price: Decimal,

    /// Dollars to spend for market buys, shares otherwise
    #[arg(long)]
    pub size: Decimal,

    #[arg(long = "type", value_enum, default_value_t = OrderKind::Limit)]
    pub kind: OrderKind,
}

impl OrderArgs {
    pub fn into_request(self, side: Side) -> OrderRequest {
        OrderRequest {
            token_id: self.token_id,
            side,
            kind: self.kind,
            price: self.price,
            size: self.size,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "buy", about = "Place a buy order on the Polymarket CLOB")]
pub struct BuyCommand {
    #[command(flatten)]
    pub order: OrderArgs,
}

#[derive(Parser, Debug)]
#[command(name = "sell", about = "Place a sell order on the Polymarket CLOB")]
pub struct SellCommand {
    #[command(flatten)]
    pub order: OrderArgs,
}

/* =======================
CANCEL
======================= */

#[derive(Parser, Debug)]
#[command(name = "cancel_orders", about = "Cancel one order, a market's orders or all orders")]
#[command(group(
    ArgGroup::new("target")
        .required(true)
        .multiple(false)
        .args(["order", "all", "market"]),
))]
pub struct CancelCommand {
    /// Order id to cancel
    #[arg(long)]
    pub order: Option<String>,

    /// Cancel every open order
    #[arg(long)]
    pub all: bool,

    /// Cancel every open order in this market (condition id)
    #[arg(long)]
    pub market: Option<String>,
}

impl CancelCommand {
    pub fn target(&self) -> CancelTarget {
        match (&self.order, &self.market) {
            (Some(id), _) => CancelTarget::Order(id.clone()),
            (None, Some(market)) => CancelTarget::Market(market.clone()),
            (None, None) => CancelTarget::All,
        }
    }
}

/* =======================
LISTING
======================= */

#[derive(Parser, Debug)]
#[command(name = "check_orders", about = "List open orders")]
pub struct ListOrdersCommand {
    /// Only orders in this market (condition id)
    #[arg(long)]
    pub market: Option<String>,

    /// Only orders for this token id
    #[arg(long = "token")]
    pub token_id: Option<String>,
}

impl ListOrdersCommand {
    pub fn filter(&self) -> OrderFilter {
        OrderFilter {
            market: self.market.clone(),
            asset_id: self.token_id.clone(),
        }
    }
}

/* =======================
NO-ARGUMENT TOOLS
======================= */

#[derive(Parser, Debug)]
#[command(name = "check_balance", about = "Gas, USDC.e and exchange balances")]
pub struct CheckBalanceCommand {}

#[derive(Parser, Debug)]
#[command(name = "check_holdings", about = "Exchange-tracked collateral balance and allowance")]
pub struct CheckHoldingsCommand {}

#[derive(Parser, Debug)]
#[command(name = "check_creds", about = "Create or derive API credentials and check the wallet")]
pub struct CheckCredsCommand {}

#[derive(Parser, Debug)]
#[command(name = "setup_allowances", about = "Check and grant the five trading approvals")]
pub struct SetupAllowancesCommand {}

/* =======================
BRIDGE
======================= */

#[derive(Parser, Debug)]
#[command(name = "send_solana_usdc", about = "Send USDC from Solana to the Polymarket bridge")]
pub struct SendSolanaUsdcCommand {
    /// USDC to send
    #[arg(long, default_value_t = DEFAULT_BRIDGE_AMOUNT)]
    pub amount: Decimal,
}

#[derive(Parser, Debug)]
#[command(name = "check_usdce_balance", about = "Check whether bridged USDC.e has landed")]
pub struct CheckUsdceCommand {
    /// Polygon address to inspect; defaults to the PRIVATE_KEY wallet
    #[arg(long)]
    pub address: Option<String>,
}

#[derive(Parser, Debug)]
#[command(name = "monitor_bridge", about = "Poll the bridge until a deposit completes")]
pub struct MonitorBridgeCommand {
    /// Deposit address to watch
    #[arg(long, default_value = BRIDGE_DEPOSIT_ADDRESS)]
    pub address: String,

    /// Seconds between polls
    #[arg(long, default_value_t = BRIDGE_POLL_INTERVAL.as_secs())]
    pub interval: u64,

    /// Give up after this many seconds
    #[arg(long, default_value_t = BRIDGE_POLL_TIMEOUT.as_secs())]
    pub timeout: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn order_defaults_to_limit() {
        let cmd: BuyCommand =
            parse_args(["buy", "--token", "71321", "--price", "0.5", "--size", "100"]).unwrap();
        let request = cmd.order.into_request(Side::Buy);
        assert_eq!(request.kind, OrderKind::Limit);
        assert_eq!(request.price, dec!(0.5));
        assert_eq!(request.size, dec!(100));
    }

    #[test]
    fn order_accepts_market_type() {
        let cmd: SellCommand = parse_args([
            "sell", "--token", "1", "--price", "0.4", "--size", "10", "--type", "market",
        ])
        .unwrap();
        assert_eq!(cmd.order.kind, OrderKind::Market);
    }

    #[test]
    fn order_requires_every_flag() {
        let err = parse_args::<BuyCommand, _, _>(["buy", "--token", "1", "--price", "0.4"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn cancel_needs_exactly_one_selector() {
        let none = parse_args::<CancelCommand, _, _>(["cancel_orders"]).unwrap_err();
        assert_eq!(none.kind(), clap::error::ErrorKind::MissingRequiredArgument);

        let two = parse_args::<CancelCommand, _, _>(["cancel_orders", "--all", "--order", "0x1"])
            .unwrap_err();
        assert_eq!(two.kind(), clap::error::ErrorKind::ArgumentConflict);

        let three = parse_args::<CancelCommand, _, _>([
            "cancel_orders",
            "--all",
            "--order",
            "0x1",
            "--market",
            "0xm",
        ]);
        assert!(three.is_err());
    }

    #[test]
    fn cancel_maps_selector_to_target() {
        let cases = [
            (vec!["c", "--order", "0x1"], CancelTarget::Order("0x1".into())),
            (vec!["c", "--all"], CancelTarget::All),
            (vec!["c", "--market", "0xm"], CancelTarget::Market("0xm".into())),
        ];
        for (args, expected) in cases {
            let cmd: CancelCommand = parse_args(args).unwrap();
            assert_eq!(cmd.target(), expected);
        }
    }

    #[test]
    fn listing_filters_are_optional() {
        let cmd: ListOrdersCommand = parse_args(["check_orders", "--token", "99"]).unwrap();
        assert_eq!(
            cmd.filter(),
            OrderFilter {
                market: None,
                asset_id: Some("99".into())
            }
        );
    }

    #[test]
    fn bridge_defaults() {
        let send: SendSolanaUsdcCommand = parse_args(["send_solana_usdc"]).unwrap();
        assert_eq!(send.amount, dec!(2));
        let monitor: MonitorBridgeCommand = parse_args(["monitor_bridge"]).unwrap();
        assert_eq!(monitor.address, BRIDGE_DEPOSIT_ADDRESS);
        assert_eq!(monitor.interval, 30);
        assert_eq!(monitor.timeout, 300);
    }
}
