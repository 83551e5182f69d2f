use anyhow::Result;
use polymarket_clob_tools::cli::{self, ListOrdersCommand};
use polymarket_clob_tools::config::{Config, ConfigField};
use polymarket_clob_tools::execution::ClobClient;
use polymarket_clob_tools::logging;
use polymarket_clob_tools::workflow::list_orders::list_orders;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let args: ListOrdersCommand = cli::parse_or_exit();

    let config = Config::from_env()?;
    config.require(&ConfigField::TRADING)?;
    let clob = ClobClient::from_config(&config)?;

    list_orders(&clob, &args.filter()).await?;
    Ok(())
}
