use anyhow::Result;
use ethers::types::{TxHash, U256};
use log::{error, info};
use rust_decimal::Decimal;
use std::time::Duration;
use thiserror::Error;

use super::pipeline::Required;
use crate::constants::{APPROVAL_COOLDOWN, GRANT_COUNTDOWN, MIN_GAS_FOR_APPROVALS};
use crate::domain::{AllowanceSet, ApprovalStep, ApprovalToken, Spender, GRANT_SEQUENCE};
use crate::logging::log_success;
use crate::report::{polygonscan_tx, print_header, print_section};
use crate::wallet::allowance::check_allowances;
use crate::wallet::{AllowanceGateway, FeeBid};

const CHECK_PHASE: Required = Required::new("allowance check");
const GAS_CHECK: Required = Required::new("gas balance check");
const FEE_ESTIMATE: Required = Required::new("fee estimation");

#[derive(Debug, Error)]
pub enum AllowanceError {
    #[error("insufficient gas for approvals: have {balance} POL, need at least {required} POL")]
    InsufficientGas { balance: Decimal, required: Decimal },

    #[error("approval {position}/5 ({step}) failed after {} confirmed: {reason}", .completed.len())]
    StepFailed {
        position: usize,
        step: String,
        completed: Vec<TxHash>,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct AllowanceOptions {
    /// Pause before the first write so the operator can abort.
    pub countdown: Duration,
    /// Pause after each confirmed approval.
    pub cooldown: Duration,
}

impl Default for AllowanceOptions {
    fn default() -> Self {
        Self {
            countdown: GRANT_COUNTDOWN,
            cooldown: APPROVAL_COOLDOWN,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GrantedApproval {
    pub step: ApprovalStep,
    pub tx: TxHash,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SetupOutcome {
    AlreadyApproved(AllowanceSet),
    Granted(Vec<GrantedApproval>),
}

// ==================================================
// CHECK PHASE
// ==================================================

/// Reads all five approvals and prints them. Never writes.
pub async fn check_phase<G>(gateway: &G) -> Result<AllowanceSet>
where
    G: AllowanceGateway + ?Sized,
{
    let set = CHECK_PHASE.run(check_allowances(gateway)).await?;
    print_allowance_table(&set);
    Ok(set)
}

fn print_allowance_table(set: &AllowanceSet) {
    print_section("CURRENT APPROVALS");
    for step in GRANT_SEQUENCE.iter() {
        let detail = match step.token {
            ApprovalToken::Usdc => {
                let raw = match step.spender {
                    Spender::Exchange => set.usdc_exchange,
                    Spender::NegRiskAdapter => set.usdc_neg_risk_adapter,
                    Spender::NegRiskExchange => set.usdc_neg_risk_exchange,
                };
                if raw == U256::MAX {
                    "unlimited".to_string()
                } else {
                    format!("{} base units", raw)
                }
            }
            ApprovalToken::Ctf => "operator".to_string(),
        };
        let icon = if set.is_approved(step) { "✅" } else { "❌" };
        println!("{} {:<36} {}", icon, step.label(), detail);
    }
}

// ==================================================
// GRANT PHASE
// ==================================================

/// Submits all five approvals in order, stopping at the first failure.
///
/// Every approval is re-sent even if some were already in place.
pub async fn grant_phase<G>(gateway: &G, options: &AllowanceOptions) -> Result<Vec<GrantedApproval>>
where
    G: AllowanceGateway + ?Sized,
{
    countdown(options.countdown).await;

    let gas = GAS_CHECK.run(gateway.gas_balance()).await?;
    info!("⛽ Gas balance: {} POL", gas);
    if gas < MIN_GAS_FOR_APPROVALS {
        return Err(AllowanceError::InsufficientGas {
            balance: gas,
            required: MIN_GAS_FOR_APPROVALS,
        }
        .into());
    }

    let fee: FeeBid = FEE_ESTIMATE.run(gateway.fee_bid()).await?;
    info!(
        "💸 Max fee {} gwei, gas limit {}",
        fee.max_fee_gwei(),
        fee.gas_limit
    );

    let total = GRANT_SEQUENCE.len();
    let mut granted: Vec<GrantedApproval> = Vec::with_capacity(total);

    for (i, step) in GRANT_SEQUENCE.iter().enumerate() {
        let position = i + 1;
        info!("📝 [{}/{}] {}", position, total, step.label());

        let sent = match gateway.broadcast(*step, &fee).await {
            Ok(tx) => tx,
            Err(e) => return Err(step_failure(position, step, &granted, e)),
        };
        println!("   ⏳ Sent: {}", polygonscan_tx(format!("{:?}", sent)));

        if let Err(e) = gateway.confirm(sent).await {
            return Err(step_failure(position, step, &granted, e));
        }
        log_success(&format!("{} confirmed", step.label()));
        granted.push(GrantedApproval {
            step: *step,
            tx: sent,
        });

        if position < total && !options.cooldown.is_zero() {
            tokio::time::sleep(options.cooldown).await;
        }
    }

    Ok(granted)
}

fn step_failure(
    position: usize,
    step: &ApprovalStep,
    granted: &[GrantedApproval],
    cause: anyhow::Error,
) -> anyhow::Error {
    error!("❌ {} failed: {:#}", step.label(), cause);
    if !granted.is_empty() {
        println!("\nApprovals confirmed before the failure (kept on chain):");
        print_links(granted);
    }
    AllowanceError::StepFailed {
        position,
        step: step.label(),
        completed: granted.iter().map(|g| g.tx).collect(),
        reason: format!("{:#}", cause),
    }
    .into()
}

async fn countdown(duration: Duration) {
    let secs = duration.as_secs();
    if secs == 0 {
        return;
    }
    println!("\nSubmitting 5 approval transactions. Press Ctrl+C to abort.");
    for remaining in (1..=secs).rev() {
        println!("   {}...", remaining);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}

fn print_links(granted: &[GrantedApproval]) {
    for (i, g) in granted.iter().enumerate() {
        println!(
            "   {}. {}: {}",
            i + 1,
            g.step.label(),
            polygonscan_tx(format!("{:?}", g.tx))
        );
    }
}

// ==================================================
// FULL WORKFLOW
// ==================================================

pub async fn setup_allowances<G>(gateway: &G, options: &AllowanceOptions) -> Result<SetupOutcome>
where
    G: AllowanceGateway + ?Sized,
{
    print_header("POLYMARKET ALLOWANCE SETUP");
    println!("Wallet: {:?}", gateway.owner());

    let set = check_phase(gateway).await?;
    if set.fully_approved() {
        log_success("All approvals already in place, nothing to do");
        return Ok(SetupOutcome::AlreadyApproved(set));
    }

    let missing = set.missing();
    println!("\n{} approval(s) missing:", missing.len());
    for step in &missing {
        println!("   • {}", step.label());
    }

    let granted = grant_phase(gateway, options).await?;

    print_section("APPROVALS GRANTED");
    print_links(&granted);
    log_success("Wallet is ready to trade");
    Ok(SetupOutcome::Granted(granted))
}
