use ethers::types::U256;
use std::fmt;

/// Token whose spending is being approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalToken {
    /// USDC.e, ERC-20 `approve`.
    Usdc,
    /// Conditional tokens, ERC-1155 `setApprovalForAll`.
    Ctf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spender {
    Exchange,
    NegRiskAdapter,
    NegRiskExchange,
}

impl fmt::Display for Spender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Spender::Exchange => f.write_str("CTF Exchange"),
            Spender::NegRiskAdapter => f.write_str("Neg Risk Adapter"),
            Spender::NegRiskExchange => f.write_str("Neg Risk Exchange"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalStep {
    pub token: ApprovalToken,
    pub spender: Spender,
}

impl ApprovalStep {
    pub const fn new(token: ApprovalToken, spender: Spender) -> Self {
        Self { token, spender }
    }

    pub fn label(&self) -> String {
        match self.token {
            ApprovalToken::Usdc => format!("USDC → {}", self.spender),
            ApprovalToken::Ctf => format!("CTF → {}", self.spender),
        }
    }
}

/// Order in which approvals are granted. Each one is confirmed before the
/// next is sent.
pub const GRANT_SEQUENCE: [ApprovalStep; 5] = [
    ApprovalStep::new(ApprovalToken::Usdc, Spender::Exchange),
    ApprovalStep::new(ApprovalToken::Ctf, Spender::Exchange),
    ApprovalStep::new(ApprovalToken::Usdc, Spender::NegRiskAdapter),
    ApprovalStep::new(ApprovalToken::Usdc, Spender::NegRiskExchange),
    ApprovalStep::new(ApprovalToken::Ctf, Spender::NegRiskExchange),
];

/// The five approvals a wallet needs to trade both market families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AllowanceSet {
    pub usdc_exchange: U256,
    pub usdc_neg_risk_adapter: U256,
    pub usdc_neg_risk_exchange: U256,
    pub ctf_exchange: bool,
    pub ctf_neg_risk_exchange: bool,
}

impl AllowanceSet {
    pub fn is_approved(&self, step: &ApprovalStep) -> bool {
        match (step.token, step.spender) {
            (ApprovalToken::Usdc, Spender::Exchange) => !self.usdc_exchange.is_zero(),
            (ApprovalToken::Usdc, Spender::NegRiskAdapter) => !self.usdc_neg_risk_adapter.is_zero(),
            (ApprovalToken::Usdc, Spender::NegRiskExchange) => {
                !self.usdc_neg_risk_exchange.is_zero()
            }
            (ApprovalToken::Ctf, Spender::Exchange) => self.ctf_exchange,
            (ApprovalToken::Ctf, Spender::NegRiskExchange) => self.ctf_neg_risk_exchange,
            // The adapter never receives a CTF approval.
            (ApprovalToken::Ctf, Spender::NegRiskAdapter) => true,
        }
    }

    pub fn missing(&self) -> Vec<ApprovalStep> {
        GRANT_SEQUENCE
            .iter()
            .filter(|step| !self.is_approved(step))
            .copied()
            .collect()
    }

    pub fn fully_approved(&self) -> bool {
        self.missing().is_empty()
    }
}
