use anyhow::Result;
use polymarket_clob_tools::cli::{self, CheckCredsCommand};
use polymarket_clob_tools::config::{Config, ConfigField};
use polymarket_clob_tools::execution::ClobClient;
use polymarket_clob_tools::logging;
use polymarket_clob_tools::wallet::balance::polygon_provider;
use polymarket_clob_tools::wallet::proxy::wallet_kind;
use polymarket_clob_tools::wallet::PolygonWallet;
use polymarket_clob_tools::workflow::credentials::{bootstrap_credentials, FunderProbe};
use polymarket_clob_tools::workflow::pipeline::BestEffort;

const FUNDER_LOOKUP: BestEffort = BestEffort::new("funder wallet code lookup");

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let _: CheckCredsCommand = cli::parse_or_exit();

    let config = Config::from_env()?;
    config.require(&[ConfigField::PrivateKey])?;
    let clob = ClobClient::from_config(&config)?;

    let provider = polygon_provider(&config.polygon_rpc)?;
    let signer = clob.signer_address();
    let signer_wallet = PolygonWallet::new(provider.clone(), signer, config.contracts.usdc);
    let funds_wallet = PolygonWallet::new(
        provider.clone(),
        config.proxy_wallet.unwrap_or(signer),
        config.contracts.usdc,
    );

    let funder = match config.proxy_wallet {
        Some(address) => Some(FunderProbe {
            address,
            kind: FUNDER_LOOKUP.run(wallet_kind(provider.as_ref(), address)).await,
        }),
        None => None,
    };

    bootstrap_credentials(&clob, &signer_wallet, &funds_wallet, funder).await;
    Ok(())
}
