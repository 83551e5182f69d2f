//! Every fixed number the tools rely on: contract addresses, decimals,
//! order minimums, advisory thresholds, fee parameters and pauses.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Duration;

// ==================================================
// NETWORK
// ==================================================

pub const POLYGON_CHAIN_ID: u64 = 137;
pub const DEFAULT_POLYGON_RPC: &str = "https://polygon-rpc.com";
pub const DEFAULT_CLOB_HOST: &str = "https://clob.polymarket.com";

// ==================================================
// CONTRACTS (Polygon mainnet)
// ==================================================

pub const USDC_ADDRESS: &str = "0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174";
pub const CTF_ADDRESS: &str = "0x4D97DCd97eC945f40cF65F87097ACe5EA0476045";
pub const CTF_EXCHANGE_ADDRESS: &str = "0x4bFb41d5B3570DeFd03C39a9A4D8dE6Bd8B8982E";
pub const NEG_RISK_EXCHANGE_ADDRESS: &str = "0xC5d563A36AE78145C45a50134d48A1215220f80a";
pub const NEG_RISK_ADAPTER_ADDRESS: &str = "0xd91E80cF2E7be2e162c6513ceD06f1dD0dA35296";

// ==================================================
// DECIMALS
// ==================================================

pub const USDC_DECIMALS: u32 = 6;
pub const CONDITIONAL_TOKEN_DECIMALS: u32 = 6;
pub const POL_DECIMALS: u32 = 18;
pub const SOL_DECIMALS: u32 = 9;

// ==================================================
// ORDER MINIMUMS
// ==================================================

/// Market orders: dollars spent (buy) or dollars received at the limit
/// price (sell).
pub const MIN_MARKET_ORDER_VALUE: Decimal = dec!(1.00);
/// Upper bound on `size` in either unit.
pub const MAX_ORDER_SIZE: Decimal = dec!(10000000);
/// Smallest tick the exchange lists.
pub const MIN_TICK_SIZE: Decimal = dec!(0.0001);
pub const MIN_LIMIT_ORDER_SHARES: Decimal = dec!(5);
pub const MIN_LIMIT_ORDER_NOTIONAL: Decimal = dec!(0.10);

// ==================================================
// ADVISORY THRESHOLDS
// ==================================================

pub const RECOMMENDED_GAS_BALANCE: Decimal = dec!(1);
pub const RECOMMENDED_USDC_BALANCE: Decimal = dec!(5);

// ==================================================
// ALLOWANCE GRANT
// ==================================================

pub const MIN_GAS_FOR_APPROVALS: Decimal = dec!(0.5);
pub const GWEI: u64 = 1_000_000_000;
pub const FALLBACK_BASE_FEE_GWEI: u64 = 30;
pub const PRIORITY_FEE_GWEI: u64 = 50;
pub const BASE_FEE_MULTIPLIER: u64 = 2;
pub const APPROVAL_GAS_LIMIT: u64 = 100_000;
pub const APPROVAL_CONFIRMATIONS: usize = 1;
pub const APPROVAL_COOLDOWN: Duration = Duration::from_secs(3);
pub const GRANT_COUNTDOWN: Duration = Duration::from_secs(5);

// ==================================================
// ORDERS
// ==================================================

pub const SCORING_CHECK_DELAY: Duration = Duration::from_secs(3);
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);
/// Opening and terminal cursors of `/data/orders` pagination.
pub const INITIAL_CURSOR: &str = "MA==";
pub const END_CURSOR: &str = "LTE=";

// ==================================================
// LINKS
// ==================================================

pub const POLYGONSCAN_TX_URL: &str = "https://polygonscan.com/tx/";
pub const POLYGONSCAN_ADDRESS_URL: &str = "https://polygonscan.com/address/";
pub const SOLSCAN_TX_URL: &str = "https://solscan.io/tx/";
pub const POLYMARKET_PROFILE_URL: &str = "https://polymarket.com/profile/";

// ==================================================
// SOLANA → POLYGON BRIDGE
// ==================================================

pub const DEFAULT_SOLANA_RPC: &str = "https://api.mainnet-beta.solana.com";
pub const SOLANA_USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
pub const BRIDGE_DEPOSIT_ADDRESS: &str = "FKxyytNAYZRAZt86hgGQLmdShrgwtsLDxgSLdH9KRoT7";
pub const DEFAULT_BRIDGE_AMOUNT: Decimal = dec!(2);
pub const MIN_SOL_FOR_FEES: Decimal = dec!(0.001);
pub const BRIDGE_STATUS_URL: &str = "https://bridge.polymarket.com/status";
pub const BRIDGE_POLL_INTERVAL: Duration = Duration::from_secs(30);
pub const BRIDGE_POLL_TIMEOUT: Duration = Duration::from_secs(300);
