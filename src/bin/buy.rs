use anyhow::{bail, Result};
use polymarket_clob_tools::cli::{self, BuyCommand};
use polymarket_clob_tools::config::{Config, ConfigField};
use polymarket_clob_tools::domain::Side;
use polymarket_clob_tools::execution::ClobClient;
use polymarket_clob_tools::logging;
use polymarket_clob_tools::workflow::order_placement::{place_order, PlacementOptions};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let args: BuyCommand = cli::parse_or_exit();
    let request = args.order.into_request(Side::Buy);

    let config = Config::from_env()?;
    config.require(&ConfigField::TRADING)?;
    let clob = ClobClient::from_config(&config)?;

    let report = place_order(&clob, &request, &PlacementOptions::default()).await?;
    if !report.response.success {
        bail!("order was not accepted by the exchange");
    }
    Ok(())
}
