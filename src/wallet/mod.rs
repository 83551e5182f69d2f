pub mod allowance;
pub mod balance;
pub mod proxy;
pub mod signer;

pub use allowance::{AllowanceGateway, ChainAllowances, FeeBid};
pub use balance::{PolygonWallet, TokenBalance, WalletReader};
pub use signer::WalletSigner;
