use anyhow::Result;
use polymarket_clob_tools::cli::{self, CheckBalanceCommand};
use polymarket_clob_tools::config::{Config, ConfigField};
use polymarket_clob_tools::execution::ClobClient;
use polymarket_clob_tools::logging;
use polymarket_clob_tools::wallet::balance::polygon_provider;
use polymarket_clob_tools::wallet::PolygonWallet;
use polymarket_clob_tools::workflow::balance::check_balance;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let _: CheckBalanceCommand = cli::parse_or_exit();

    let config = Config::from_env()?;
    config.require(&[ConfigField::PrivateKey])?;
    // Exchange queries without credentials fail on their own; the on-chain ones still run.
    let clob = ClobClient::from_config(&config)?;

    let provider = polygon_provider(&config.polygon_rpc)?;
    let owner = config.proxy_wallet.unwrap_or_else(|| clob.signer_address());
    let wallet = PolygonWallet::new(provider, owner, config.contracts.usdc);

    check_balance(&wallet, &clob).await;
    Ok(())
}
