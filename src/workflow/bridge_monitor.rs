use anyhow::{bail, Result};
use log::info;
use std::time::{Duration, Instant};

use super::pipeline::BestEffort;
use crate::bridge::{BridgeStatusClient, BridgeTransaction};
use crate::constants::{BRIDGE_POLL_INTERVAL, BRIDGE_POLL_TIMEOUT};
use crate::domain::time::clock_now;
use crate::logging::log_success;
use crate::report::print_header;

const STATUS_POLL: BestEffort = BestEffort::new("bridge status poll");

#[derive(Debug, Clone)]
pub struct MonitorOptions {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            interval: BRIDGE_POLL_INTERVAL,
            timeout: BRIDGE_POLL_TIMEOUT,
        }
    }
}

/// Polls until a completed deposit shows up for `address` or time runs out.
pub async fn monitor_bridge(
    client: &BridgeStatusClient,
    address: &str,
    options: &MonitorOptions,
) -> Result<BridgeTransaction> {
    print_header("BRIDGE STATUS MONITOR");
    println!("Deposit address: {}", address);
    println!(
        "Polling every {}s for up to {}s",
        options.interval.as_secs(),
        options.timeout.as_secs()
    );

    let started = Instant::now();
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        if let Some(status) = STATUS_POLL.run(client.fetch(address)).await {
            if let Some(done) = status.completed() {
                log_success("Bridge transfer completed");
                println!("   Hash:   {}", done.transaction_hash.as_deref().unwrap_or("N/A"));
                if let Some(amount) = &done.amount {
                    println!("   Amount: {}", amount);
                }
                return Ok(done.clone());
            }
            let latest = status
                .transactions
                .last()
                .map(|tx| format!("{} ({})", tx.status, tx.short_hash()))
                .unwrap_or_else(|| "no transactions yet".to_string());
            info!("⏳ [{}] poll {}: {}", clock_now(), attempt, latest);
        }

        if started.elapsed() + options.interval >= options.timeout {
            bail!(
                "no completed bridge transfer for {} after {}s",
                address,
                options.timeout.as_secs()
            );
        }
        tokio::time::sleep(options.interval).await;
    }
}
