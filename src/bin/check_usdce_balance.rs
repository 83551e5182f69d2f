use anyhow::{Context, Result};
use ethers::types::Address;
use polymarket_clob_tools::cli::{self, CheckUsdceCommand};
use polymarket_clob_tools::config::{Config, ConfigError, ConfigField};
use polymarket_clob_tools::logging;
use polymarket_clob_tools::wallet::balance::polygon_provider;
use polymarket_clob_tools::wallet::{PolygonWallet, WalletSigner};
use polymarket_clob_tools::workflow::balance::check_landing;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let args: CheckUsdceCommand = cli::parse_or_exit();
    let config = Config::from_env()?;

    let owner: Address = match (&args.address, &config.private_key) {
        (Some(raw), _) => raw
            .parse()
            .with_context(|| format!("invalid Polygon address {}", raw))?,
        (None, Some(key)) => WalletSigner::polygon(key)?.address(),
        (None, None) => return Err(ConfigError::Missing(vec![ConfigField::PrivateKey]).into()),
    };

    let provider = polygon_provider(&config.polygon_rpc)?;
    let wallet = PolygonWallet::new(provider, owner, config.contracts.usdc);
    check_landing(&wallet).await?;
    Ok(())
}
