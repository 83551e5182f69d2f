//! Request signing for the two exchange auth levels.
//!
//! L1 headers carry an EIP-712 wallet signature and are only used to create or
//! derive API credentials. L2 headers carry an HMAC-SHA256 of the request made
//! with the API secret and authorise everything else.

use base64::{engine::general_purpose, Engine as _};
use ethers::utils::to_checksum;
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use sha2::Sha256;

use super::errors::ClobError;
use crate::domain::ApiCredentials;
use crate::wallet::signer::WalletSigner;

type HmacSha256 = Hmac<Sha256>;

// Header names are case-insensitive; `HeaderName::from_static` wants lowercase.
pub const POLY_ADDRESS: &str = "poly_address";
pub const POLY_SIGNATURE: &str = "poly_signature";
pub const POLY_TIMESTAMP: &str = "poly_timestamp";
pub const POLY_NONCE: &str = "poly_nonce";
pub const POLY_API_KEY: &str = "poly_api_key";
pub const POLY_PASSPHRASE: &str = "poly_passphrase";

// ==================================================
// HMAC SIGNATURE GENERATION
// ==================================================

/// URL-safe base64 HMAC of `timestamp + method + path + body`.
///
/// `path` excludes the query string.
pub fn build_hmac_signature(
    secret: &str,
    timestamp: u64,
    method: &str,
    path: &str,
    body: Option<&str>,
) -> Result<String, ClobError> {
    let key = decode_secret(secret)?;
    let message = format!("{}{}{}{}", timestamp, method, path, body.unwrap_or_default());

    let mut mac = HmacSha256::new_from_slice(&key)
        .map_err(|e| ClobError::InvalidSecret(e.to_string()))?;
    mac.update(message.as_bytes());

    Ok(general_purpose::URL_SAFE.encode(mac.finalize().into_bytes()))
}

// Secrets are issued URL-safe but older ones were standard base64
fn decode_secret(secret: &str) -> Result<Vec<u8>, ClobError> {
    general_purpose::URL_SAFE
        .decode(secret)
        .or_else(|_| general_purpose::STANDARD.decode(secret))
        .map_err(|e| ClobError::InvalidSecret(e.to_string()))
}

pub fn l2_headers(
    address: &str,
    creds: &ApiCredentials,
    timestamp: u64,
    method: &str,
    path: &str,
    body: Option<&str>,
) -> Result<HeaderMap, ClobError> {
    let signature = build_hmac_signature(&creds.secret, timestamp, method, path, body)?;

    header_map(&[
        (POLY_ADDRESS, address.to_string()),
        (POLY_SIGNATURE, signature),
        (POLY_TIMESTAMP, timestamp.to_string()),
        (POLY_API_KEY, creds.api_key.clone()),
        (POLY_PASSPHRASE, creds.passphrase.clone()),
    ])
}

pub async fn l1_headers(
    signer: &WalletSigner,
    timestamp: u64,
    nonce: u64,
) -> Result<HeaderMap, ClobError> {
    let signature = signer
        .sign_clob_auth(timestamp, nonce)
        .await
        .map_err(|e| ClobError::Signing(e.to_string()))?;

    header_map(&[
        (POLY_ADDRESS, to_checksum(&signer.address(), None)),
        (POLY_SIGNATURE, signature),
        (POLY_TIMESTAMP, timestamp.to_string()),
        (POLY_NONCE, nonce.to_string()),
    ])
}

fn header_map(pairs: &[(&'static str, String)]) -> Result<HeaderMap, ClobError> {
    let mut headers = HeaderMap::new();
    for (name, value) in pairs {
        let value =
            HeaderValue::from_str(value).map_err(|e| ClobError::Signing(e.to_string()))?;
        headers.insert(HeaderName::from_static(*name), value);
    }
    Ok(headers)
}
