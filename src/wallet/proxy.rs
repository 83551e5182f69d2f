use anyhow::Result;
use ethers::prelude::*;
use ethers::types::Address;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletKind {
    /// Plain key-controlled account.
    Eoa,
    /// Deployed code: a Polymarket proxy or Gnosis Safe.
    Contract,
}

pub async fn wallet_kind<M: Middleware + 'static>(client: &M, address: Address) -> Result<WalletKind> {
    let code = client
        .get_code(address, None)
        .await
        .map_err(|e| anyhow::anyhow!("code lookup failed: {}", e))?;
    Ok(if code.0.is_empty() {
        WalletKind::Eoa
    } else {
        WalletKind::Contract
    })
}
