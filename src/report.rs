use colored::Colorize;
use rust_decimal::Decimal;

use crate::constants::{
    POLYGONSCAN_ADDRESS_URL, POLYGONSCAN_TX_URL, POLYMARKET_PROFILE_URL, SOLSCAN_TX_URL,
};

// ==================================================
// BANNERS
// ==================================================

const BOX_WIDTH: usize = 48;

pub fn print_header(title: &str) {
    println!("\n╔{}╗", "═".repeat(BOX_WIDTH));
    println!("║ {:<width$} ║", title, width = BOX_WIDTH - 2);
    println!("╚{}╝\n", "═".repeat(BOX_WIDTH));
}

pub fn divider() -> String {
    "=".repeat(60)
}

pub fn print_section(title: &str) {
    println!("\n{}", divider());
    println!("{}", title);
    println!("{}", divider());
}

pub fn print_step(num: usize, total: usize, description: &str) {
    println!("\n[{}/{}] {}...", num, total, description);
}

// ==================================================
// CHECK RESULTS
// ==================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

impl CheckStatus {
    pub fn icon(&self) -> &'static str {
        match self {
            CheckStatus::Pass => "✅",
            CheckStatus::Warn => "⚠️ ",
            CheckStatus::Fail => "❌",
        }
    }

    pub fn word(&self) -> String {
        match self {
            CheckStatus::Pass => "OK".green().bold().to_string(),
            CheckStatus::Warn => "WARN".yellow().bold().to_string(),
            CheckStatus::Fail => "FAIL".red().bold().to_string(),
        }
    }
}

/// One line of an operator report plus optional indented detail.
#[derive(Debug, Clone)]
pub struct Check {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
}

impl Check {
    pub fn new(name: impl Into<String>, status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status,
            message: message.into(),
        }
    }

    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Pass, message)
    }

    pub fn warn(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Warn, message)
    }

    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Fail, message)
    }

    pub fn print(&self) {
        println!("{} {} [{}]", self.status.icon(), self.name, self.status.word());
        for line in self.message.lines() {
            println!("   {}", line);
        }
    }
}

pub fn print_summary(checks: &[Check]) {
    let count = |status| checks.iter().filter(|c| c.status == status).count();

    print_header("SUMMARY");
    println!("✅ Passed:   {}", count(CheckStatus::Pass));
    println!("⚠️  Warnings: {}", count(CheckStatus::Warn));
    println!("❌ Failed:   {}", count(CheckStatus::Fail));
    println!();
}

// ==================================================
// FORMATTING
// ==================================================

/// `0.55` → `55.0¢ ($0.55)`.
pub fn cents(price: Decimal) -> String {
    format!("{:.1}¢ (${:.2})", price * Decimal::ONE_HUNDRED, price)
}

pub fn usd(amount: Decimal) -> String {
    format!("${:.2}", amount)
}

pub fn polygonscan_tx(hash: impl std::fmt::Display) -> String {
    format!("{}{}", POLYGONSCAN_TX_URL, hash)
}

pub fn polygonscan_address(address: impl std::fmt::Display) -> String {
    format!("{}{}", POLYGONSCAN_ADDRESS_URL, address)
}

pub fn solscan_tx(signature: impl std::fmt::Display) -> String {
    format!("{}{}", SOLSCAN_TX_URL, signature)
}

pub fn profile_link(address: impl std::fmt::Display) -> String {
    format!("{}{}", POLYMARKET_PROFILE_URL, address)
}
