use anyhow::Result;
use rust_decimal::Decimal;

use super::pipeline::{BestEffort, Required};
use crate::constants::{RECOMMENDED_GAS_BALANCE, RECOMMENDED_USDC_BALANCE};
use crate::domain::{AssetType, BalanceSnapshot, CollateralStatus, GasStatus, LandingStatus};
use crate::execution::ExchangeApi;
use crate::report::{
    polygonscan_address, print_header, print_summary, print_step, profile_link, usd, Check,
};
use crate::wallet::{TokenBalance, WalletReader};

const GAS_BALANCE: BestEffort = BestEffort::new("gas balance query");
const USDC_BALANCE: BestEffort = BestEffort::new("USDC.e balance query");
const EXCHANGE_BALANCE: BestEffort = BestEffort::new("exchange balance query");
const LANDING_BALANCE: Required = Required::new("USDC.e balance query");

/// Whatever each independent query managed to return.
#[derive(Debug, Clone, Default)]
pub struct BalanceReport {
    pub gas: Option<Decimal>,
    pub usdc: Option<TokenBalance>,
    pub exchange: Option<BalanceSnapshot>,
    pub checks: Vec<Check>,
}

// ==================================================
// CHECK BALANCE
// ==================================================

pub async fn check_balance<W, E>(wallet: &W, exchange: &E) -> BalanceReport
where
    W: WalletReader + ?Sized,
    E: ExchangeApi + ?Sized,
{
    print_header("POLYMARKET WALLET BALANCES");
    println!("Wallet: {:?}", wallet.owner());
    println!("Signer: {:?}", exchange.address());

    let mut report = BalanceReport::default();

    print_step(1, 3, "Checking gas balance (POL)");
    report.gas = GAS_BALANCE.run(wallet.gas_balance()).await;
    report.checks.push(gas_check(report.gas));

    print_step(2, 3, "Checking on-chain USDC.e");
    report.usdc = USDC_BALANCE.run(wallet.usdc_balance()).await;
    report.checks.push(usdc_check(report.usdc.as_ref()));

    print_step(3, 3, "Checking exchange balance and allowance");
    report.exchange = EXCHANGE_BALANCE
        .run(exchange.balance_allowance(&AssetType::Collateral))
        .await;
    report.checks.push(exchange_check(report.exchange.as_ref()));

    println!();
    for check in &report.checks {
        check.print();
    }
    print_summary(&report.checks);
    println!("🔗 {}", polygonscan_address(format!("{:?}", wallet.owner())));
    println!("🔗 {}", profile_link(format!("{:?}", wallet.owner())));

    report
}

// ==================================================
// CHECK HOLDINGS
// ==================================================

pub async fn check_holdings<E>(exchange: &E) -> Option<BalanceSnapshot>
where
    E: ExchangeApi + ?Sized,
{
    print_header("POLYMARKET EXCHANGE HOLDINGS");
    println!("Signer: {:?}", exchange.address());

    let snapshot = EXCHANGE_BALANCE
        .run(exchange.balance_allowance(&AssetType::Collateral))
        .await;
    exchange_check(snapshot.as_ref()).print();
    snapshot
}

// ==================================================
// BRIDGE LANDING
// ==================================================

/// Looks for bridged USDC.e at `wallet`'s address.
pub async fn check_landing<W>(wallet: &W) -> Result<LandingStatus>
where
    W: WalletReader + ?Sized,
{
    print_header("BRIDGED USDC.e CHECK");
    println!("Address: {:?}", wallet.owner());

    let usdc = LANDING_BALANCE.run(wallet.usdc_balance()).await?;
    println!("Balance: {} {}", usdc.amount, usdc.symbol);

    let status = LandingStatus::classify(usdc.amount);
    match status {
        LandingStatus::Landed => println!("\n✅ Bridge completed: funds have arrived on Polygon"),
        LandingStatus::Pending => {
            println!("\n⏳ No USDC.e yet: the bridge is still processing");
            println!("   Deposits usually land within a few minutes; run monitor_bridge to watch it.");
        }
    }
    Ok(status)
}

// ==================================================
// CHECK BUILDERS
// ==================================================

fn gas_check(balance: Option<Decimal>) -> Check {
    let name = "Gas (POL)";
    match balance {
        None => Check::fail(name, "query failed"),
        Some(b) => match GasStatus::classify(b) {
            GasStatus::Sufficient => Check::pass(name, format!("{} POL", b.round_dp(4))),
            GasStatus::Low => Check::warn(
                name,
                format!(
                    "{} POL\nKeep more than {} POL for transaction fees",
                    b.round_dp(4),
                    RECOMMENDED_GAS_BALANCE
                ),
            ),
        },
    }
}

fn usdc_check(balance: Option<&TokenBalance>) -> Check {
    let name = "On-chain USDC.e";
    match balance {
        None => Check::fail(name, "query failed"),
        Some(b) => {
            let line = format!("{} {} ({} decimals)", b.amount, b.symbol, b.decimals);
            match CollateralStatus::classify(b.amount) {
                CollateralStatus::Sufficient => Check::pass(name, line),
                CollateralStatus::BelowRecommended => Check::warn(
                    name,
                    format!("{}\nAt least {} is recommended for trading", line, usd(RECOMMENDED_USDC_BALANCE)),
                ),
                CollateralStatus::Empty => Check::warn(
                    name,
                    format!("{}\nWallet is empty: deposit USDC.e on Polygon or bridge it with send_solana_usdc", line),
                ),
            }
        }
    }
}

fn exchange_check(snapshot: Option<&BalanceSnapshot>) -> Check {
    let name = "Exchange collateral";
    match snapshot {
        None => Check::fail(name, "query failed"),
        Some(s) => {
            let allowance = s
                .allowance
                .map(|a| if a == Decimal::MAX { "unlimited".to_string() } else { usd(a) })
                .unwrap_or_else(|| "unknown".to_string());
            let line = format!("Balance: {}\nAllowance: {}", usd(s.balance), allowance);
            if s.allowance_short() {
                Check::warn(
                    name,
                    format!("{}\nAllowance is below balance: run setup_allowances", line),
                )
            } else {
                Check::pass(name, line)
            }
        }
    }
}
