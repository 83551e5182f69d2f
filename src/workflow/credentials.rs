use ethers::types::Address;
use log::info;

use super::pipeline::BestEffort;
use crate::constants::RECOMMENDED_USDC_BALANCE;
use crate::domain::{ApiCredentials, CollateralStatus, GasStatus};
use crate::execution::CredentialApi;
use crate::report::{print_header, print_step, print_summary, usd, Check};
use crate::wallet::proxy::WalletKind;
use crate::wallet::WalletReader;

const GAS_BALANCE: BestEffort = BestEffort::new("gas balance query");
const CREATE_OR_DERIVE: BestEffort = BestEffort::new("API key create/derive");
const USDC_BALANCE: BestEffort = BestEffort::new("USDC.e balance query");
const KEY_VALIDATION: BestEffort = BestEffort::new("API key validation");

/// What each bootstrap step produced; `None` means skipped or failed.
#[derive(Debug, Clone, Default)]
pub struct CredentialReport {
    pub credentials: Option<ApiCredentials>,
    pub validated: Option<bool>,
    pub funder_kind: Option<WalletKind>,
    pub checks: Vec<Check>,
}

/// Configured proxy wallet and, if the lookup worked, whether it has code.
#[derive(Debug, Clone, Copy)]
pub struct FunderProbe {
    pub address: Address,
    pub kind: Option<WalletKind>,
}

/// `signer_wallet` pays gas; `funds_wallet` holds the USDC.e (the proxy
/// wallet when one is configured).
pub async fn bootstrap_credentials<C, W>(
    clob: &C,
    signer_wallet: &W,
    funds_wallet: &W,
    funder: Option<FunderProbe>,
) -> CredentialReport
where
    C: CredentialApi + ?Sized,
    W: WalletReader + ?Sized,
{
    print_header("POLYMARKET CREDENTIAL CHECK");
    println!("Signer: {:?}", clob.address());

    let mut report = CredentialReport::default();

    // ==================================================
    // STEP 1: GAS
    // ==================================================
    print_step(1, 4, "Checking gas balance");
    let check = match GAS_BALANCE.run(signer_wallet.gas_balance()).await {
        Some(gas) if GasStatus::classify(gas) == GasStatus::Sufficient => {
            Check::pass("Gas (POL)", format!("{} POL", gas.round_dp(4)))
        }
        Some(gas) => Check::warn(
            "Gas (POL)",
            format!("{} POL\nTop up POL before sending transactions", gas.round_dp(4)),
        ),
        None => Check::fail("Gas (POL)", "query failed"),
    };
    check.print();
    report.checks.push(check);

    // ==================================================
    // STEP 2: API CREDENTIALS
    // ==================================================
    print_step(2, 4, "Creating or deriving API credentials");
    report.credentials = CREATE_OR_DERIVE.run(clob.create_or_derive_api_key()).await;
    let check = match &report.credentials {
        Some(creds) => {
            println!("\n🔑 API credentials");
            println!("   API key:    {}", creds.api_key);
            println!("   Secret:     {}", creds.secret);
            println!("   Passphrase: {}", creds.passphrase);
            println!("\nAdd these lines to .env:");
            for line in creds.env_lines() {
                println!("   {}", line);
            }
            Check::pass("API credentials", format!("key {}", creds.api_key))
        }
        None => Check::fail("API credentials", "could not create or derive a key"),
    };
    report.checks.push(check);

    // ==================================================
    // STEP 3: CONFIGURED CREDENTIALS
    // ==================================================
    print_step(3, 4, "Validating configured credentials");
    if clob.has_credentials() {
        let check = match USDC_BALANCE.run(funds_wallet.usdc_balance()).await {
            Some(b) if CollateralStatus::classify(b.amount) == CollateralStatus::Sufficient => {
                Check::pass("USDC.e", format!("{} {}", b.amount, b.symbol))
            }
            Some(b) => Check::warn(
                "USDC.e",
                format!(
                    "{} {}\nFund the wallet with at least {}",
                    b.amount,
                    b.symbol,
                    usd(RECOMMENDED_USDC_BALANCE)
                ),
            ),
            None => Check::fail("USDC.e", "query failed"),
        };
        check.print();
        report.checks.push(check);

        report.validated = Some(KEY_VALIDATION.run(clob.api_keys()).await.is_some());
        let check = if report.validated == Some(true) {
            Check::pass("Configured API key", "accepted by the exchange")
        } else {
            Check::fail("Configured API key", "rejected; replace it with the lines above")
        };
        check.print();
        report.checks.push(check);
    } else {
        println!("   Skipped: POLY_API_KEY, POLY_SECRET and POLY_PASSPHRASE are not all set");
    }

    // ==================================================
    // STEP 4: FUNDER WALLET
    // ==================================================
    print_step(4, 4, "Inspecting funder wallet");
    match funder {
        Some(funder) => {
            report.funder_kind = funder.kind;
            let check = match funder.kind {
                Some(WalletKind::Contract) => Check::pass(
                    "Funder wallet",
                    format!("{:?} is a contract wallet (proxy or Safe)", funder.address),
                ),
                Some(WalletKind::Eoa) => Check::warn(
                    "Funder wallet",
                    format!(
                        "{:?} has no code; signature types 1 and 2 expect a proxy or Safe",
                        funder.address
                    ),
                ),
                None => Check::fail("Funder wallet", "code lookup failed"),
            };
            check.print();
            report.checks.push(check);
        }
        None => {
            info!("🧾 No PROXY_WALLET configured, the signer holds the funds");
        }
    }

    print_summary(&report.checks);
    report
}
