use anyhow::Result;
use std::time::Duration;
use polymarket_clob_tools::bridge::BridgeStatusClient;
use polymarket_clob_tools::cli::{self, MonitorBridgeCommand};
use polymarket_clob_tools::logging;
use polymarket_clob_tools::workflow::bridge_monitor::{monitor_bridge, MonitorOptions};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let args: MonitorBridgeCommand = cli::parse_or_exit();

    let client = BridgeStatusClient::polymarket()?;
    let options = MonitorOptions {
        interval: Duration::from_secs(args.interval),
        timeout: Duration::from_secs(args.timeout),
    };

    monitor_bridge(&client, &args.address, &options).await?;
    Ok(())
}
