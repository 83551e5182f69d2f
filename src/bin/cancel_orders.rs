use anyhow::Result;
use polymarket_clob_tools::cli::{self, CancelCommand};
use polymarket_clob_tools::config::{Config, ConfigField};
use polymarket_clob_tools::execution::ClobClient;
use polymarket_clob_tools::logging;
use polymarket_clob_tools::workflow::cancel::cancel_orders;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let args: CancelCommand = cli::parse_or_exit();

    let config = Config::from_env()?;
    config.require(&ConfigField::TRADING)?;
    let clob = ClobClient::from_config(&config)?;

    cancel_orders(&clob, &args.target()).await?;
    Ok(())
}
