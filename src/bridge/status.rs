use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::constants::{BRIDGE_STATUS_URL, HTTP_TIMEOUT};

pub const COMPLETED: &str = "COMPLETED";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BridgeStatus {
    #[serde(default)]
    pub transactions: Vec<BridgeTransaction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeTransaction {
    #[serde(default)]
    pub status: String,
    #[serde(rename = "transactionHash", default)]
    pub transaction_hash: Option<String>,
    #[serde(default)]
    pub amount: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BridgeTransaction {
    pub fn is_completed(&self) -> bool {
        self.status == COMPLETED
    }

    /// First 16 characters of the hash, for one-line progress output.
    pub fn short_hash(&self) -> String {
        match &self.transaction_hash {
            Some(hash) => format!("{}...", hash.chars().take(16).collect::<String>()),
            None => "N/A".to_string(),
        }
    }
}

impl BridgeStatus {
    pub fn completed(&self) -> Option<&BridgeTransaction> {
        self.transactions.iter().find(|tx| tx.is_completed())
    }
}

pub struct BridgeStatusClient {
    http: Client,
    base_url: String,
}

impl BridgeStatusClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            http: Client::builder().timeout(HTTP_TIMEOUT).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn polymarket() -> Result<Self> {
        Self::new(BRIDGE_STATUS_URL)
    }

    pub async fn fetch(&self, address: &str) -> Result<BridgeStatus> {
        let resp = self
            .http
            .get(format!("{}/{}", self.base_url, address))
            .header("Accept", "application/json")
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(anyhow!("bridge status returned {}", resp.status()));
        }
        Ok(resp.json().await?)
    }
}
