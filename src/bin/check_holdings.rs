use anyhow::{bail, Result};
use polymarket_clob_tools::cli::{self, CheckHoldingsCommand};
use polymarket_clob_tools::config::{Config, ConfigField};
use polymarket_clob_tools::execution::ClobClient;
use polymarket_clob_tools::logging;
use polymarket_clob_tools::workflow::balance::check_holdings;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let _: CheckHoldingsCommand = cli::parse_or_exit();

    let config = Config::from_env()?;
    config.require(&ConfigField::TRADING)?;
    let clob = ClobClient::from_config(&config)?;

    if check_holdings(&clob).await.is_none() {
        bail!("could not read the exchange balance");
    }
    Ok(())
}
