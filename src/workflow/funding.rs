use anyhow::Result;
use rust_decimal::Decimal;
use solana_sdk::signature::Signature;

use super::pipeline::Required;
use crate::bridge::SolanaFunding;
use crate::logging::log_success;
use crate::report::{print_header, print_section, solscan_tx};

const PREFLIGHT: Required = Required::new("Solana pre-flight");
const TRANSFER: Required = Required::new("USDC transfer");

/// Sends `amount` USDC to the bridge deposit address and reports the
/// signature. Does not wait for the bridge itself.
pub async fn send_to_bridge(funding: &SolanaFunding, amount: Decimal) -> Result<Signature> {
    print_header("SOLANA → POLYGON USDC BRIDGE");
    println!("From:   {}", funding.sender());
    println!("Amount: {} USDC", amount);

    let preflight = PREFLIGHT.run(funding.preflight()).await?;
    println!("\nSOL balance:  {} SOL", preflight.sol_balance);
    match preflight.usdc_balance {
        Some(b) => println!("USDC balance: {} USDC", b),
        None => println!("USDC balance: no token account"),
    }
    PREFLIGHT
        .run(async { preflight.ensure_sufficient(amount) })
        .await?;

    let signature = TRANSFER.run(funding.send(amount, &preflight)).await?;
    log_success("Transfer confirmed on Solana");

    print_section("TRANSFER SENT");
    println!("Signature: {}", signature);
    println!("Explorer:  {}", solscan_tx(&signature));
    println!("\n⏱️  Expected timeline");
    println!("   • Solana confirmation: seconds (done)");
    println!("   • Bridge relay to Polygon: usually 2-10 minutes");
    println!("   • USDC.e appears in the Polygon wallet once relayed");
    println!("\nTrack it with monitor_bridge, then confirm with check_usdce_balance.");

    Ok(signature)
}
