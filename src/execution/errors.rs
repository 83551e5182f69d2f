use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClobError {
    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{path} returned {status}: {body}")]
    Api {
        path: String,
        status: u16,
        body: String,
    },

    #[error("could not decode {path} response: {reason}")]
    Decode { path: String, reason: String },

    #[error("API credentials required; run check_creds first")]
    MissingCredentials,

    #[error("API secret is not valid base64: {0}")]
    InvalidSecret(String),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("price {price} is outside the tradable range for tick size {tick} ({tick} - {max})")]
    InvalidPrice {
        price: Decimal,
        tick: Decimal,
        max: Decimal,
    },

    #[error("price {price} is not a multiple of tick size {tick}")]
    OffTickPrice { price: Decimal, tick: Decimal },

    #[error("invalid order: {0}")]
    InvalidOrder(String),
}

impl ClobError {
    /// Structured detail supplied by the exchange, pretty-printed when it is
    /// JSON.
    pub fn remote_detail(&self) -> Option<String> {
        match self {
            ClobError::Api { body, .. } => Some(
                serde_json::from_str::<serde_json::Value>(body)
                    .ok()
                    .and_then(|v| serde_json::to_string_pretty(&v).ok())
                    .unwrap_or_else(|| body.clone()),
            ),
            _ => None,
        }
    }
}
