use anyhow::{anyhow, Result};
use ethers::providers::{Http, Provider};
use log::warn;
use polymarket_clob_tools::cli::{self, SetupAllowancesCommand};
use polymarket_clob_tools::config::{Config, ConfigField, SignatureType};
use polymarket_clob_tools::logging;
use polymarket_clob_tools::wallet::{ChainAllowances, WalletSigner};
use polymarket_clob_tools::workflow::allowance_setup::{setup_allowances, AllowanceOptions};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let _: SetupAllowancesCommand = cli::parse_or_exit();

    let config = Config::from_env()?;
    config.require(&[ConfigField::PrivateKey])?;
    if config.signature_type != SignatureType::Eoa {
        warn!("⚠️ Approvals are sent from the signer EOA; a proxy or Safe wallet must grant its own");
    }

    let signer = WalletSigner::polygon(config.private_key()?)?;
    let provider = Provider::<Http>::try_from(config.polygon_rpc.as_str())
        .map_err(|e| anyhow!("RPC error: {}", e))?;
    let gateway = ChainAllowances::new(provider, signer.wallet().clone(), config.contracts);

    setup_allowances(&gateway, &AllowanceOptions::default()).await?;
    Ok(())
}
