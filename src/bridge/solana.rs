use anyhow::{Context, Result};
use log::info;
use rust_decimal::Decimal;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::transaction::Transaction;
use spl_associated_token_account::get_associated_token_address;
use spl_associated_token_account::instruction::create_associated_token_account_idempotent;
use std::str::FromStr;
use thiserror::Error;

use crate::constants::{MIN_SOL_FOR_FEES, SOL_DECIMALS, USDC_DECIMALS};
use crate::domain::balance::{parse_scaled, to_base_units, to_decimal};

#[derive(Debug, Error, PartialEq)]
pub enum FundingError {
    #[error("SOLANA_PRIVATE_KEY is not a valid base58 keypair: {0}")]
    InvalidKey(String),

    #[error("invalid Solana address {0}")]
    InvalidAddress(String),

    #[error("amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    #[error("insufficient SOL for fees: have {balance}, need at least {required}")]
    InsufficientSol { balance: Decimal, required: Decimal },

    #[error("sender has no USDC token account")]
    MissingTokenAccount,

    #[error("insufficient USDC: have {balance}, need {required}")]
    InsufficientUsdc { balance: Decimal, required: Decimal },
}

pub fn parse_keypair(base58: &str) -> Result<Keypair, FundingError> {
    let bytes = bs58::decode(base58.trim())
        .into_vec()
        .map_err(|e| FundingError::InvalidKey(e.to_string()))?;
    Keypair::from_bytes(&bytes).map_err(|e| FundingError::InvalidKey(e.to_string()))
}

pub fn parse_pubkey(raw: &str) -> Result<Pubkey, FundingError> {
    Pubkey::from_str(raw.trim()).map_err(|_| FundingError::InvalidAddress(raw.to_string()))
}

/// What the sender holds before the transfer is built.
#[derive(Debug, Clone, PartialEq)]
pub struct FundingPreflight {
    pub sol_balance: Decimal,
    /// `None` when the sender has no token account for the mint.
    pub usdc_balance: Option<Decimal>,
    pub source_account: Pubkey,
    pub destination_account: Pubkey,
    pub destination_exists: bool,
}

impl FundingPreflight {
    /// Fee and balance checks; nothing is sent when this fails.
    pub fn ensure_sufficient(&self, amount: Decimal) -> Result<(), FundingError> {
        if amount <= Decimal::ZERO {
            return Err(FundingError::InvalidAmount(amount));
        }
        if self.sol_balance < MIN_SOL_FOR_FEES {
            return Err(FundingError::InsufficientSol {
                balance: self.sol_balance,
                required: MIN_SOL_FOR_FEES,
            });
        }
        let usdc = self.usdc_balance.ok_or(FundingError::MissingTokenAccount)?;
        if usdc < amount {
            return Err(FundingError::InsufficientUsdc {
                balance: usdc,
                required: amount,
            });
        }
        Ok(())
    }
}

/// Sends SPL USDC from the configured keypair to one fixed owner.
pub struct SolanaFunding {
    rpc: RpcClient,
    payer: Keypair,
    mint: Pubkey,
    destination_owner: Pubkey,
}

impl SolanaFunding {
    pub fn new(rpc_url: &str, payer: Keypair, mint: Pubkey, destination_owner: Pubkey) -> Self {
        Self {
            rpc: RpcClient::new_with_commitment(rpc_url.to_string(), CommitmentConfig::confirmed()),
            payer,
            mint,
            destination_owner,
        }
    }

    pub fn sender(&self) -> Pubkey {
        self.payer.pubkey()
    }

    async fn account_exists(&self, account: &Pubkey) -> Result<bool> {
        let resp = self
            .rpc
            .get_account_with_commitment(account, CommitmentConfig::confirmed())
            .await
            .with_context(|| format!("account lookup for {} failed", account))?;
        Ok(resp.value.is_some())
    }

    pub async fn preflight(&self) -> Result<FundingPreflight> {
        let sender = self.sender();
        let source_account = get_associated_token_address(&sender, &self.mint);
        let destination_account = get_associated_token_address(&self.destination_owner, &self.mint);

        let lamports = self
            .rpc
            .get_balance(&sender)
            .await
            .context("SOL balance query failed")?;
        let sol_balance = to_decimal(lamports.into(), SOL_DECIMALS);

        let usdc_balance = if self.account_exists(&source_account).await? {
            let ui = self
                .rpc
                .get_token_account_balance(&source_account)
                .await
                .context("USDC balance query failed")?;
            parse_scaled(&ui.amount, ui.decimals as u32)
        } else {
            None
        };

        let destination_exists = self.account_exists(&destination_account).await?;

        Ok(FundingPreflight {
            sol_balance,
            usdc_balance,
            source_account,
            destination_account,
            destination_exists,
        })
    }

    /// One transaction: optional idempotent ATA creation, then
    /// `transfer_checked`. Returns once confirmed.
    pub async fn send(&self, amount: Decimal, preflight: &FundingPreflight) -> Result<Signature> {
        let units = to_base_units(amount, USDC_DECIMALS)
            .ok_or(FundingError::InvalidAmount(amount))?;
        let sender = self.sender();

        let mut instructions = Vec::with_capacity(2);
        if !preflight.destination_exists {
            info!("🏗️ Destination token account missing, creating it in the same transaction");
            instructions.push(create_associated_token_account_idempotent(
                &sender,
                &self.destination_owner,
                &self.mint,
                &spl_token::id(),
            ));
        }
        instructions.push(spl_token::instruction::transfer_checked(
            &spl_token::id(),
            &preflight.source_account,
            &self.mint,
            &preflight.destination_account,
            &sender,
            &[],
            units,
            USDC_DECIMALS as u8,
        )?);

        let blockhash = self
            .rpc
            .get_latest_blockhash()
            .await
            .context("blockhash query failed")?;
        let tx = Transaction::new_signed_with_payer(
            &instructions,
            Some(&sender),
            &[&self.payer],
            blockhash,
        );

        info!("📤 Sending {} USDC to {}", amount, self.destination_owner);
        let signature = self
            .rpc
            .send_and_confirm_transaction(&tx)
            .await
            .context("transfer failed")?;
        Ok(signature)
    }
}
