use serde::Deserialize;
use std::collections::BTreeMap;

/// What a cancel request removes. Exactly one selector per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelTarget {
    Order(String),
    All,
    Market(String),
}

/// `canceled` / `not_canceled` as returned by every cancel endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CancelOutcome {
    #[serde(default)]
    pub canceled: Vec<String>,
    #[serde(default)]
    pub not_canceled: BTreeMap<String, String>,
}

impl CancelOutcome {
    pub fn is_partial(&self) -> bool {
        !self.canceled.is_empty() && !self.not_canceled.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.canceled.is_empty() && self.not_canceled.is_empty()
    }
}
