use anyhow::Result;
use polymarket_clob_tools::bridge::solana::{parse_keypair, parse_pubkey};
use polymarket_clob_tools::bridge::SolanaFunding;
use polymarket_clob_tools::cli::{self, SendSolanaUsdcCommand};
use polymarket_clob_tools::config::{Config, ConfigField};
use polymarket_clob_tools::constants::{BRIDGE_DEPOSIT_ADDRESS, SOLANA_USDC_MINT};
use polymarket_clob_tools::logging;
use polymarket_clob_tools::workflow::funding::send_to_bridge;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let args: SendSolanaUsdcCommand = cli::parse_or_exit();

    let config = Config::from_env()?;
    config.require(&[ConfigField::SolanaPrivateKey])?;

    let payer = parse_keypair(config.solana_private_key()?)?;
    let mint = parse_pubkey(SOLANA_USDC_MINT)?;
    let deposit = parse_pubkey(BRIDGE_DEPOSIT_ADDRESS)?;
    let funding = SolanaFunding::new(&config.solana_rpc, payer, mint, deposit);

    send_to_bridge(&funding, args.amount).await?;
    Ok(())
}
