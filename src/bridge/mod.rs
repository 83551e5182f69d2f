//! Solana → Polygon USDC funding through the Polymarket bridge.

pub mod solana;
pub mod status;

pub use solana::{FundingError, FundingPreflight, SolanaFunding};
pub use status::{BridgeStatus, BridgeStatusClient, BridgeTransaction};
