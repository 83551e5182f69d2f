//! Command-line tools for trading on the Polymarket CLOB: order placement,
//! cancellation, order and balance inspection, API credential bootstrap,
//! on-chain approvals and Solana → Polygon USDC funding.

pub mod bridge;
pub mod cli;
pub mod config;
pub mod constants;
pub mod domain;
pub mod execution;
pub mod logging;
pub mod report;
pub mod wallet;
pub mod workflow;
